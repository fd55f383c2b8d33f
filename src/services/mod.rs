pub mod historie_service;
pub mod kunde_service;
pub mod material_service;
pub mod posten_service;
pub mod schuld_service;

pub use historie_service::{HistorieEintrag, HistorieService, HistorieTag};
pub use kunde_service::KundeService;
pub use material_service::MaterialService;
pub use posten_service::{PostenMatService, PostenNoMatService};
pub use schuld_service::{GlaeubigerService, SchuldnerService};
