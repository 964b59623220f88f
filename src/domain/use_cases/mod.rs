pub mod download;
pub mod gallery;
