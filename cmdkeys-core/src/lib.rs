pub mod compose;
pub mod editor;
pub mod error;
pub mod field;
pub mod keybind;
pub mod labels;
pub mod layout;
pub mod model;
pub mod policy;
pub mod reorder;
pub mod rowlist;
pub mod store;

pub use compose::{compose, ComposeEnv, KeyCapture, MacroControl};
pub use editor::{EditorConfig, Effect, MacroEditor};
pub use error::{CoreError, Result, RowListError};
pub use field::{parse_ticks, TicksError};
pub use keybind::{KeybindCatalog, KeybindInfo, ProfileKeybinds};
pub use labels::Labels;
pub use layout::{LayoutConfig, ListDims, ListGeometry, ListLayout, Measure, TextMeasure, UnicodeMeasure};
pub use model::{
    ConflictStrategy, Control, Keybind, Macro, Message, Profile, RepeatHandle, SendMode,
    MESSAGE_CHAR_LIMIT,
};
pub use reorder::{resolve_drop, DropOutcome, SlotKind};
pub use rowlist::{Change, ControlEvent, Dispatch, KeyInput, Row, RowKind, RowList, Slot, Widget, WidgetKind};
pub use store::ProfileStore;
