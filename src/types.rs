use serde_json::{Map, Value};

/// Task name as passed to the dispatcher.
/// Examples: `SST2`, `ReCoRD`, `MultiRC__sub`
pub type TaskName = String;
/// Optional subtask carried after the `__` separator.
/// Example: `sub` in `MultiRC__sub`
pub type SubtaskName = String;
/// Dataset repository id on the hub.
/// Examples: `nyu-mll/glue`, `SetFit/sst5`, `aps/super_glue`
pub type DatasetId = String;
/// Dataset config (subset) name.
/// Examples: `sst2`, `wsc.fixed`, `plain_text`
pub type ConfigName = String;
/// Split name as published by the dataset.
/// Examples: `train`, `validation`, `validation_matched`, `test`
pub type SplitName = String;
/// Column name inside a raw example.
/// Examples: `label`, `choice1`, `answers_spans`
pub type FieldName = String;
/// One raw example as fetched from a dataset provider.
/// Example: `{"idx": 0, "sentence": "hide new secretions ...", "label": 0}`
pub type RawExample = Map<String, Value>;
