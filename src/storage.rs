mod export;
mod input;

pub use export::{ExportError, to_json, write_json};
pub use input::{InputError, ListFormat, load_allow_list, load_course_list, parse_course_list};
