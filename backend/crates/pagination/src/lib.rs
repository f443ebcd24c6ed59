//! Opaque cursor and pagination envelope primitives shared by endpoints.
//!
//! The crate implements keyset pagination: callers fetch `limit + 1` rows
//! ordered by a stable key, drop the surplus row to detect whether another
//! page exists, and hand the last displayed row's key back to the client as
//! an opaque cursor.
//!
//! # Example
//!
//! ```
//! use pagination::{Cursor, Page, PageRequest};
//!
//! let request: PageRequest<u32> = PageRequest::new(None, Some(2), 10, 50);
//! let rows = vec![9_u32, 8, 7];
//! let page = Page::from_overfetched(rows, request.limit(), |row| *row)
//!     .expect("cursor encodes");
//!
//! assert!(page.has_next_page());
//! assert_eq!(page.items(), &[9, 8]);
//! let next = page.next_cursor().expect("next cursor");
//! let decoded: Cursor<u32> = Cursor::decode(next).expect("cursor decodes");
//! assert_eq!(decoded.key(), &8);
//! ```

mod cursor;
mod links;
mod page;
mod request;

pub use cursor::{Cursor, CursorError};
pub use links::{CURSOR_PARAM, LIMIT_PARAM, next_page_link};
pub use page::Page;
pub use request::PageRequest;
