pub mod builder;
pub mod client;
pub mod method;
pub mod request;
pub mod response;
