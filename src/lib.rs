#![allow(non_snake_case)]
#![allow(type_alias_bounds)]
#![allow(clippy::assertions_on_result_states)]
#![allow(clippy::needless_range_loop)]
#![allow(clippy::len_without_is_empty)]
#![allow(clippy::too_long_first_doc_paragraph)]

pub mod columns;
pub mod field;
pub mod poly;
pub mod protogalaxy;
pub mod relations;
pub mod transcripts;
pub mod utils;
