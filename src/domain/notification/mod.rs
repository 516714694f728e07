//! Notification model and field-extraction policy

mod event;
mod extract;

pub use event::{
    NotificationContent, NotificationEvent, NotificationResponse, Origin, OriginData,
};
pub use extract::{derive_body, derive_title, render_payload, NO_BODY, NO_TITLE};
