mod reply;
mod text_received;

pub use reply::send_reply;
pub use text_received::text_received;
