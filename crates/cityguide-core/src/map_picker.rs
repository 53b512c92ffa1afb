//! Coordinate picking through an injected map widget.
//!
//! The core never touches the widget directly: it hands the widget a
//! [`MapView`] and a click handler, and reads back whatever the last valid
//! click was.

use std::sync::{Arc, Mutex, PoisonError};

use crate::model::Coordinate;
use crate::CoreError;

/// Highest zoom level the map widget accepts.
pub const MAX_ZOOM: u8 = 19;

/// Zoom used when a map is centred on a single location.
pub const DETAIL_ZOOM: u8 = 17;

/// Initial camera for a map widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MapView {
    pub center: Coordinate,
    pub zoom: u8,
}

impl MapView {
    /// # Errors
    ///
    /// [`CoreError::InvalidCoordinate`] for an out-of-range centre,
    /// [`CoreError::InvalidZoom`] for a zoom above [`MAX_ZOOM`].
    pub fn new(center: Coordinate, zoom: u8) -> Result<Self, CoreError> {
        if zoom > MAX_ZOOM {
            return Err(CoreError::InvalidZoom(zoom));
        }
        Ok(Self {
            center: center.validate()?,
            zoom,
        })
    }
}

pub type ClickHandler = Box<dyn FnMut(Coordinate) + Send>;

/// Capability offered by an interactive map.
pub trait MapWidget {
    /// Called once before any click handler is registered.
    fn initialize(&mut self, view: MapView);

    /// Registers the handler invoked with the coordinate of every click.
    fn on_click(&mut self, handler: ClickHandler);
}

/// Holds the coordinate a new location will be submitted with.
///
/// Clones share the same cell, so a clone captured by the widget's click
/// handler updates what [`current_coordinate`](Self::current_coordinate)
/// returns.
#[derive(Debug, Clone)]
pub struct MapCoordinatePicker {
    current: Arc<Mutex<Coordinate>>,
}

impl MapCoordinatePicker {
    /// Starts a picker at `default`, typically the configured city centre.
    ///
    /// # Errors
    ///
    /// [`CoreError::InvalidCoordinate`] if `default` is out of range.
    pub fn new(default: Coordinate) -> Result<Self, CoreError> {
        Ok(Self {
            current: Arc::new(Mutex::new(default.validate()?)),
        })
    }

    /// Initializes `widget` with `view` and wires its clicks into a picker
    /// starting at the view's centre.
    pub fn attach<W>(widget: &mut W, view: MapView) -> Self
    where
        W: MapWidget + ?Sized,
    {
        let picker = Self {
            current: Arc::new(Mutex::new(view.center)),
        };
        widget.initialize(view);
        let handle = picker.clone();
        widget.on_click(Box::new(move |coord| {
            handle.on_map_click(coord);
        }));
        picker
    }

    /// Records a click. Out-of-range or non-finite coordinates are ignored and
    /// the previous value is kept. Returns whether the click was accepted.
    pub fn on_map_click(&self, coord: Coordinate) -> bool {
        if !coord.is_valid() {
            tracing::debug!(%coord, "ignoring invalid map click");
            return false;
        }
        *self.lock() = coord;
        true
    }

    #[must_use]
    pub fn current_coordinate(&self) -> Coordinate {
        *self.lock()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Coordinate> {
        self.current.lock().unwrap_or_else(PoisonError::into_inner)
    }
}
