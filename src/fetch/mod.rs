#[cfg(test)]
use mockall::automock;
use std::error::Error;

pub mod http;

#[cfg_attr(test, automock)]
pub trait Fetch {
    fn fetch(&self) -> Result<Vec<u8>, Box<dyn Error>>;
}
