use crate::geometry::Point;
use crate::input::types::InputEvent;

/// Reduce an event to one viewport coordinate
///
/// The primary touch contact wins over the event's own pointer coordinates.
/// Returns `None` when no usable, finite coordinate exists.
pub fn normalize(event: &InputEvent) -> Option<Point> {
    let point = match event.touches.first() {
        Some(touch) => Point::new(touch.client_x, touch.client_y),
        None => Point::new(event.client_x?, event.client_y?),
    };

    point.is_finite().then_some(point)
}
