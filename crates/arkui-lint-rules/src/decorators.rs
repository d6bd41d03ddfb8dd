//! Names of the built-in ArkUI decorators the rules look at.

pub const MONITOR: &str = "Monitor";
pub const OBSERVED_V1: &str = "Observed";
pub const OBSERVED_V2: &str = "ObservedV2";
pub const COMPONENT_V1: &str = "Component";
pub const COMPONENT_V2: &str = "ComponentV2";
pub const TRACE: &str = "Trace";
pub const COMPUTED: &str = "Computed";
pub const LOCAL: &str = "Local";
pub const PARAM: &str = "Param";
pub const PROVIDER: &str = "Provider";
pub const CONSUMER: &str = "Consumer";
pub const ENTRY: &str = "Entry";
pub const PREVIEW: &str = "Preview";

/// State decorators that make a struct member watchable.
pub const STRUCT_STATE: &[&str] = &[LOCAL, PARAM, PROVIDER, CONSUMER, COMPUTED];
