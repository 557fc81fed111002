mod credentials;
mod dashboard;

pub use credentials::draw_credential_setup;
pub use dashboard::draw_dashboard;
