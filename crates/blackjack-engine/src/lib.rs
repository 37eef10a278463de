pub mod command;
pub mod counter;
pub mod error;
pub mod scan;
pub mod session;

pub use command::{ActuatorSink, Commands, DispatchReport, LineSink, dispatch, encode};
pub use counter::{CountEngine, ScanReport};
pub use error::{ScanError, SinkError};
pub use scan::{ConfidenceAggregator, ConfidenceTable, ScanGeometry, Side, resolve};
pub use session::{
    AutoScan, CardClassifier, Clock, ExitReason, FrameSource, MonotonicClock, Operator, Phase,
    ScanMachine, Session, SessionEvent, SessionSummary, Step, Trigger,
};
