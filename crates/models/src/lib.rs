pub mod company;
pub mod db;
