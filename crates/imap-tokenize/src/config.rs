//! Tokenizer configuration.

/// Nesting cap for owned value trees when no `max_depth` is configured.
pub const DEFAULT_MAX_VALUE_DEPTH: usize = 512;

/// How the tokenizer treats malformed input.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TokenizerConfig {
    /// Report malformed input as [`Error::Malformed`](crate::Error::Malformed)
    /// instead of degrading to partial data and sentinels.
    pub strict: bool,
    /// Deepest list nesting accepted.
    ///
    /// The token stream only enforces this in strict mode. Building owned
    /// values always caps the tree at this depth, or at
    /// [`DEFAULT_MAX_VALUE_DEPTH`] when unset.
    pub max_depth: Option<usize>,
}

impl TokenizerConfig {
    /// Lenient configuration: never fails on malformed input.
    #[must_use]
    pub const fn lenient() -> Self {
        Self {
            strict: false,
            max_depth: None,
        }
    }

    /// Strict configuration with no depth limit on the token stream.
    #[must_use]
    pub const fn strict() -> Self {
        Self {
            strict: true,
            max_depth: None,
        }
    }

    /// Creates a configuration builder.
    #[must_use]
    pub fn builder() -> TokenizerConfigBuilder {
        TokenizerConfigBuilder::default()
    }

    /// Nesting depth allowed when building owned values.
    #[must_use]
    pub const fn value_depth_limit(&self) -> usize {
        match self.max_depth {
            Some(depth) => depth,
            None => DEFAULT_MAX_VALUE_DEPTH,
        }
    }
}

/// Builder for [`TokenizerConfig`].
#[derive(Debug, Clone, Default)]
pub struct TokenizerConfigBuilder {
    config: TokenizerConfig,
}

impl TokenizerConfigBuilder {
    /// Enables or disables strict mode.
    #[must_use]
    pub const fn strict(mut self, strict: bool) -> Self {
        self.config.strict = strict;
        self
    }

    /// Sets the deepest list nesting accepted.
    #[must_use]
    pub const fn max_depth(mut self, depth: usize) -> Self {
        self.config.max_depth = Some(depth);
        self
    }

    /// Builds the configuration.
    #[must_use]
    pub const fn build(self) -> TokenizerConfig {
        self.config
    }
}
