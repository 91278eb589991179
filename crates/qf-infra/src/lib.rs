pub mod remote;
pub mod time;
pub mod widget;

pub use remote::{RestDataGateway, RestGatewayConfig};
pub use time::SystemClock;
pub use widget::FileWidgetSlot;
