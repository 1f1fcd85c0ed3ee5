mod metrics;
mod rects;

pub use metrics::{BoardMetrics, STACK_ALLOWANCE, VERTICAL_BORDER};
pub use rects::{Rect, SpaceRects, bottom_row};
