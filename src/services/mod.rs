pub mod api_client;
pub mod navigation;
pub mod session_cookie;

#[cfg(target_arch = "wasm32")]
pub mod storage_events;

pub use api_client::{ApiClient, HttpReply, Method, Transport};
pub use navigation::{Navigator, RecordingNavigator};
pub use session_cookie::find_cookie;

#[cfg(target_arch = "wasm32")]
pub use api_client::GlooTransport;
#[cfg(target_arch = "wasm32")]
pub use navigation::BrowserNavigator;
#[cfg(target_arch = "wasm32")]
pub use session_cookie::read_cookie;
