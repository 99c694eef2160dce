//! ビューモジュール

pub mod admin_dashboard;
pub mod public_site;

pub use admin_dashboard::AdminDashboard;
pub use public_site::PublicSite;
