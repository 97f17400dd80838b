mod camera;
mod config_form;
mod connection;
mod stat_card;
mod toast;

pub use camera::CameraPanel;
pub use config_form::{AdvancedForm, ScheduleForm};
pub use connection::ConnectionIndicator;
pub use stat_card::StatCard;
pub use toast::{ToastContainer, ToastProvider, use_toasts};
