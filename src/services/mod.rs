mod relay;

pub use relay::{RelayOutcome, RelayService};
