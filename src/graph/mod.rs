//! The page graph: an entity store plus the id relations built over it.

pub mod entity_set;
pub mod page;
pub mod resolve;
pub mod table_view;

pub use entity_set::{Admission, EntitySet};
pub use page::{Page, PageKind};
pub use resolve::{attach_parents, link_children, resolve};
pub use table_view::{TableColumn, TableRow, TableView};
