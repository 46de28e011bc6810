pub mod company;
pub mod errors;

#[cfg(test)]
mod test_support;
