//! Field definition and builder.
//!
//! A [`FieldDefinition`] holds the configured destination, naming policy,
//! allowed-type list, overwrite policy and the two ordered hook registries.
//! It is built once at setup time and immutable afterwards except for hook
//! registration, which takes `&mut self`: once a definition is shared behind
//! an `Arc` with an executing pipeline, registration is unrepresentable, so
//! in-flight executions always see a fixed snapshot of the hook chains.

use std::sync::Arc;

use chrono::Utc;

use relokit_core::{HookPhase, Record, StoredMetadata, UploadError, UploadHook};

/// Maps (record, candidate name) to the final artifact name. The candidate
/// already carries the date prefix when one is configured.
pub type NamingPolicy = Arc<dyn Fn(&dyn Record, &str) -> String + Send + Sync>;

/// Maps (record, metadata, href) to a display string.
pub type Formatter = Arc<dyn Fn(&dyn Record, &StoredMetadata, &str) -> String + Send + Sync>;

pub struct FieldDefinition {
    destination: String,
    overwrite: bool,
    allowed_types: Vec<String>,
    naming_policy: Option<NamingPolicy>,
    date_prefix: Option<String>,
    public_prefix: Option<String>,
    formatter: Option<Formatter>,
    pre_move: Vec<Arc<dyn UploadHook>>,
    post_move: Vec<Arc<dyn UploadHook>>,
}

impl std::fmt::Debug for FieldDefinition {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FieldDefinition")
            .field("destination", &self.destination)
            .field("overwrite", &self.overwrite)
            .field("allowed_types", &self.allowed_types)
            .field("naming_policy", &self.naming_policy.as_ref().map(|_| ".."))
            .field("date_prefix", &self.date_prefix)
            .field("public_prefix", &self.public_prefix)
            .field("formatter", &self.formatter.as_ref().map(|_| ".."))
            .field(
                "pre_move",
                &self.pre_move.iter().map(|h| h.name()).collect::<Vec<_>>(),
            )
            .field(
                "post_move",
                &self.post_move.iter().map(|h| h.name()).collect::<Vec<_>>(),
            )
            .finish()
    }
}

impl FieldDefinition {
    pub fn builder() -> FieldDefinitionBuilder {
        FieldDefinitionBuilder::default()
    }

    /// Target directory artifacts are relocated into.
    pub fn destination(&self) -> &str {
        &self.destination
    }

    /// Whether relocation clobbers an occupied destination.
    pub fn overwrite(&self) -> bool {
        self.overwrite
    }

    /// Public-location override; when unset the storage path is used.
    pub fn public_prefix(&self) -> Option<&str> {
        self.public_prefix.as_deref()
    }

    pub fn formatter(&self) -> Option<&Formatter> {
        self.formatter.as_ref()
    }

    /// True when the declared content type passes the allowed-type list.
    /// An empty list means unrestricted.
    pub fn accepts_type(&self, content_type: &str) -> bool {
        self.allowed_types.is_empty() || self.allowed_types.iter().any(|t| t == content_type)
    }

    /// The frozen hook chain for a phase, in registration order.
    pub fn hooks(&self, phase: HookPhase) -> &[Arc<dyn UploadHook>] {
        match phase {
            HookPhase::PreMove => &self.pre_move,
            HookPhase::PostMove => &self.post_move,
        }
    }

    /// Append a hook to a phase chain. Only possible while the definition
    /// is still uniquely owned, i.e. before any pipeline holds it.
    pub fn register_hook(&mut self, phase: HookPhase, hook: Arc<dyn UploadHook>) {
        match phase {
            HookPhase::PreMove => self.pre_move.push(hook),
            HookPhase::PostMove => self.post_move.push(hook),
        }
    }

    /// Append a hook using a textual phase token. Fails with
    /// [`UploadError::UnsupportedPhase`] for anything other than
    /// `pre-move` / `post-move`.
    pub fn register_hook_named(
        &mut self,
        phase: &str,
        hook: Arc<dyn UploadHook>,
    ) -> Result<(), UploadError> {
        let phase = phase.parse::<HookPhase>()?;
        self.register_hook(phase, hook);
        Ok(())
    }

    /// Compute the final artifact name for a declared name: the date prefix
    /// (when configured) is applied first, so the naming policy always sees
    /// the fully-prefixed candidate.
    pub fn resolve_name(&self, record: &dyn Record, declared_name: &str) -> String {
        let candidate = match &self.date_prefix {
            Some(format) => format!("{}-{}", Utc::now().format(format), declared_name),
            None => declared_name.to_string(),
        };

        match &self.naming_policy {
            Some(policy) => policy(record, &candidate),
            None => candidate,
        }
    }
}

/// Builder for [`FieldDefinition`]. `build` fails with
/// [`UploadError::Configuration`] when no destination was given.
#[derive(Default)]
pub struct FieldDefinitionBuilder {
    destination: Option<String>,
    overwrite: Option<bool>,
    allowed_types: Vec<String>,
    naming_policy: Option<NamingPolicy>,
    date_prefix: Option<String>,
    public_prefix: Option<String>,
    formatter: Option<Formatter>,
    pre_move: Vec<Arc<dyn UploadHook>>,
    post_move: Vec<Arc<dyn UploadHook>>,
}

impl FieldDefinitionBuilder {
    pub fn destination(mut self, destination: impl Into<String>) -> Self {
        self.destination = Some(destination.into());
        self
    }

    pub fn overwrite(mut self, overwrite: bool) -> Self {
        self.overwrite = Some(overwrite);
        self
    }

    pub fn allowed_types<I, S>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowed_types = types.into_iter().map(Into::into).collect();
        self
    }

    pub fn naming_policy(
        mut self,
        policy: impl Fn(&dyn Record, &str) -> String + Send + Sync + 'static,
    ) -> Self {
        self.naming_policy = Some(Arc::new(policy));
        self
    }

    /// chrono format string prepended (with a `-` separator) to every
    /// declared name, e.g. `%Y-%m-%d`.
    pub fn date_prefix(mut self, format: impl Into<String>) -> Self {
        self.date_prefix = Some(format.into());
        self
    }

    pub fn public_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.public_prefix = Some(prefix.into());
        self
    }

    pub fn formatter(
        mut self,
        formatter: impl Fn(&dyn Record, &StoredMetadata, &str) -> String + Send + Sync + 'static,
    ) -> Self {
        self.formatter = Some(Arc::new(formatter));
        self
    }

    pub fn pre_move_hook(mut self, hook: Arc<dyn UploadHook>) -> Self {
        self.pre_move.push(hook);
        self
    }

    pub fn post_move_hook(mut self, hook: Arc<dyn UploadHook>) -> Self {
        self.post_move.push(hook);
        self
    }

    pub fn build(self) -> Result<FieldDefinition, UploadError> {
        let destination = match self.destination {
            Some(dest) if !dest.is_empty() => dest,
            _ => {
                return Err(UploadError::Configuration(
                    "upload fields require the \"destination\" option to be set".to_string(),
                ))
            }
        };

        Ok(FieldDefinition {
            destination,
            // Overwrite collisions unless explicitly disabled.
            overwrite: self.overwrite.unwrap_or(true),
            allowed_types: self.allowed_types,
            naming_policy: self.naming_policy,
            date_prefix: self.date_prefix,
            public_prefix: self.public_prefix,
            formatter: self.formatter,
            pre_move: self.pre_move,
            post_move: self.post_move,
        })
    }
}
