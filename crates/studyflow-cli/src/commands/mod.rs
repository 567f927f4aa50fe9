pub mod grade;
pub mod init;
pub mod review;
pub mod stats;
pub mod validate;
