pub mod blob;
pub mod http_repo;
pub mod proxy;
pub mod record;
