//! # Event Bus Module
//!
//! Publish/subscribe channel between the field editor and its host.
//!
//! ## Usage
//!
//! ```rust
//! use fieldkit_core::event_bus::{EventBus, EventCategory, EventFilter, FieldEvent};
//!
//! let bus = EventBus::new();
//! let subscription = bus.subscribe(
//!     EventFilter::Categories(vec![EventCategory::Area]),
//!     |event| {
//!         if let FieldEvent::TotalAreaChanged { hectares } = event {
//!             println!("total area: {hectares:.2} ha");
//!         }
//!     },
//! );
//!
//! bus.publish(FieldEvent::TotalAreaChanged { hectares: 1.5 });
//! bus.unsubscribe(subscription);
//! ```

mod bus;
mod events;

pub use bus::*;
pub use events::*;
