pub mod amend;
pub mod audit;
pub mod book;
pub mod bundle;
pub mod cancel;
pub mod dispatch;
pub mod init;
pub mod list;
pub mod report;
pub mod schema;
pub mod shared;
pub mod show;
