pub mod delete_image;
pub mod home;
pub mod json_error;
pub mod system;
