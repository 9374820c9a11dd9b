//! Domain model (variants, instances, dispositions).

pub mod disposition;
pub mod instance;
pub mod variant;

pub use self::disposition::Disposition;
pub use self::instance::{ErrorInstance, Reportable};
pub use self::variant::{DEFAULT_STATUS, ErrorName, ErrorSpec, ErrorVariant, RESERVED_NAMES};
