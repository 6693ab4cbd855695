//! Output formatter trait

use rasa_bridge_domain::Delivery;

/// Trait for rendering deliveries
pub trait OutputFormatter: Send + Sync {
    /// Render one delivery
    fn format(&self, delivery: &Delivery) -> String;
}
