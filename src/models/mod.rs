pub mod shipment;

pub use shipment::Model as Shipment;
