use std::{sync::Arc, time::SystemTime};

use tsumiki::*;

// Define regular traits and implementor structs

trait Logger: Send + Sync {
    fn log(&self, content: &str);
}

trait DateLogger: Send + Sync {
    fn log_date(&self);
}

#[derive(Default)]
struct LoggerImpl;

impl Logger for LoggerImpl {
    fn log(&self, content: &str) {
        println!("{}", content);
    }
}

struct DateLoggerImpl {
    logger: Arc<dyn Logger>,
    prefix: String,
}

impl DateLoggerImpl {
    fn new(logger: Arc<dyn Logger>) -> Self {
        Self::with_prefix(logger, Arc::new("now".to_string()))
    }

    fn with_prefix(logger: Arc<dyn Logger>, prefix: Arc<String>) -> Self {
        Self {
            logger,
            prefix: prefix.to_string(),
        }
    }
}

impl DateLogger for DateLoggerImpl {
    fn log_date(&self) {
        let now = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .unwrap();
        self.logger
            .log(&format!("[{}] {}s since epoch", self.prefix, now.as_secs()));
    }
}

// Describe the constructors and the implemented contracts
injectable!(LoggerImpl => LoggerImpl::default);
injectable!(DateLoggerImpl => DateLoggerImpl::new, DateLoggerImpl::with_prefix);
implements!(LoggerImpl => dyn Logger);
implements!(DateLoggerImpl => dyn DateLogger);

fn main() -> Result<(), ResolveError> {
    let mut services = ServiceCollection::new();
    services
        .add_singleton::<Arc<dyn Logger>, LoggerImpl>()
        .add_scoped::<Arc<dyn DateLogger>, DateLoggerImpl>()
        .add_named_transient_with("session", |_| Ok(Arc::new("session".to_string())))?;
    let provider = services.build()?;

    // The prefix is registered under a name: the constructor without it is selected
    let scope = provider.create_scope();
    let logger: Arc<dyn DateLogger> = scope.get_required()?;
    logger.log_date();

    // Register the prefix without a name to use the richer constructor
    let mut services = ServiceCollection::new();
    services
        .add_singleton::<Arc<dyn Logger>, LoggerImpl>()
        .add_scoped::<Arc<dyn DateLogger>, DateLoggerImpl>()
        .add_singleton_instance(Arc::new("demo".to_string()));
    let provider = services.build()?;

    let scope = provider.create_scope();
    let logger: Arc<dyn DateLogger> = scope.get_required()?;
    logger.log_date();
    scope.dispose();

    Ok(())
}
