//! Management transport: named objects with readable and writable attributes

pub mod managed;
pub mod object_name;
pub mod server;

pub use managed::{Attribute, ManagedObject};
pub use object_name::ObjectName;
pub use server::{Exporter, ManagementServer};
