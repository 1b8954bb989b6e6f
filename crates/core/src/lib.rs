pub mod captcha;
pub mod config;
pub mod orchestrator;
pub mod persist;
pub mod portal;
pub mod response;
pub mod retry;
pub mod testing;

pub use captcha::{
    CaptchaError, CaptchaGuess, CaptchaSolver, Confidence, LowConfidenceHandler, OcrEngine,
    PassthroughHandler, PromptHandler, TesseractOcr,
};
pub use config::{
    load_config, load_config_from_str, validate_config, Config, ConfigError, OcrConfig,
    OutputConfig, PortalConfig, QueryConfig,
};
pub use orchestrator::{
    DateOrchestrator, DateResolution, OrchestratorConfig, OrchestratorError, RangeDriver,
    RunSummary,
};
pub use persist::{
    document_filename, ArtifactPersister, BlobStore, CsvRecordSink, FsBlobStore, PersistError,
    RecordSink,
};
pub use portal::{FormState, PortalClient, PortalError, PortalGateway, SubmissionPayload};
pub use response::{classify, extract_records, OrderRecord, SubmissionOutcome};
