pub mod host;
pub mod layer_replace;
pub mod pipeline;
pub mod progress;
pub mod quantizer;
pub mod undo;

pub use host::{LayerStack, ModeConverter, Quantizer, SelectionService, TransactionService};
pub use layer_replace::replace_layer;
pub use pipeline::{OcsPipeline, PipelineReport, UNDO_LABEL};
pub use progress::{CancelToken, Cancellable, NoProgress, ProgressSink, TracingProgress};
pub use quantizer::PaletteQuantizer;
pub use undo::UndoGroup;
