pub mod answer;
pub mod catalog;
pub mod demographics;
pub mod loaders;
pub mod question;
pub mod record;
pub mod respondent;
pub mod screen;

pub use answer::{AnswerBundle, AnswerValue};
pub use catalog::{Catalog, ScreenForm};
pub use demographics::{AgeBracket, Gender};
pub use loaders::load_catalog;
pub use question::{ChoiceOption, InputKind, QuestionDescriptor};
pub use record::{SectionRecord, RECORD_COLUMNS};
pub use respondent::{CacheKey, RespondentContext};
pub use screen::Screen;
