//! Label normalization for method and technique names
//!
//! Models spell the same method many ways ("ANN", "Artificial Neural
//! Network"). Rules map variants onto one canonical label so frequency
//! tables count them together.

use serde::{Deserialize, Serialize};

/// One canonical label and the variants that map onto it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizationRule {
    /// Canonical label
    pub label: String,

    /// Variants matched against the whole trimmed name (case-insensitive)
    #[serde(default)]
    pub exact: Vec<String>,

    /// Keywords matched as substrings of the name (case-insensitive)
    #[serde(default)]
    pub contains: Vec<String>,
}

impl NormalizationRule {
    fn new(label: &str, exact: &[&str], contains: &[&str]) -> Self {
        Self {
            label: label.to_string(),
            exact: exact.iter().map(|s| s.to_string()).collect(),
            contains: contains.iter().map(|s| s.to_string()).collect(),
        }
    }

    fn matches(&self, lowered: &str) -> bool {
        self.exact.iter().any(|v| v.trim().to_lowercase() == lowered)
            || self
                .contains
                .iter()
                .any(|k| !k.is_empty() && lowered.contains(&k.to_lowercase()))
    }
}

/// Ordered rule table; the first matching rule wins
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NormalizationRules(pub Vec<NormalizationRule>);

impl NormalizationRules {
    /// Canonical label for `name`, or `None` for an empty name
    ///
    /// Names no rule matches are kept as written (trimmed).
    ///
    /// # Examples
    ///
    /// ```
    /// use paperlens_aggregator::NormalizationRules;
    ///
    /// let rules = NormalizationRules::default_methods();
    /// assert_eq!(rules.normalize(" ann ").as_deref(), Some("Neural Network / ANN"));
    /// assert_eq!(rules.normalize("XGBoost").as_deref(), Some("XGBoost"));
    /// assert_eq!(rules.normalize("   "), None);
    /// ```
    pub fn normalize(&self, name: &str) -> Option<String> {
        let trimmed = name.trim();
        if trimmed.is_empty() {
            return None;
        }
        let lowered = trimmed.to_lowercase();
        let label = self
            .0
            .iter()
            .find(|rule| rule.matches(&lowered))
            .map_or(trimmed, |rule| rule.label.as_str());
        Some(label.to_string())
    }

    /// Built-in method table (whole-name aliases)
    pub fn default_methods() -> Self {
        Self(vec![
            NormalizationRule::new(
                "Neural Network / ANN",
                &["ANN", "Artificial Neural Network", "Artificial Neural Networks"],
                &[],
            ),
            NormalizationRule::new(
                "Deep Neural Network (DNN)",
                &["DNN", "Deep Neural Network", "Deep Neural Networks"],
                &[],
            ),
            NormalizationRule::new(
                "Convolutional Neural Network (CNN)",
                &["CNN", "Convolutional Neural Network", "Convolutional Neural Networks"],
                &[],
            ),
            NormalizationRule::new("LSTM", &["LSTM", "Long Short-Term Memory"], &[]),
            NormalizationRule::new("PINN", &["PINN", "PINNs", "Physics-Informed Neural Network"], &[]),
            NormalizationRule::new("GAN", &["GAN", "Generative Adversarial Network"], &[]),
            NormalizationRule::new(
                "SVM / SVR",
                &["SVM", "SVR", "Support Vector Machine", "Support Vector Regression"],
                &[],
            ),
            NormalizationRule::new(
                "Gaussian Process (GP/GPR)",
                &["Gaussian Process", "Gaussian Process Regression", "GPR", "GP"],
                &[],
            ),
            NormalizationRule::new("Random Forest (RF)", &["Random Forest", "RF"], &[]),
        ])
    }

    /// Built-in technique table (keyword rules, most specific first)
    pub fn default_techniques() -> Self {
        Self(vec![
            NormalizationRule::new(
                "Multi-Fidelity Data Fusion",
                &[],
                &["multi-fidelity", "multifidelity", "multi fidelity", "dual fidelity", "bi-fidelity"],
            ),
            NormalizationRule::new("Transfer Learning", &[], &["transfer learn", "fine-tun", "fine tun"]),
            NormalizationRule::new(
                "Physics-Informed Methods / PINN",
                &[],
                &["physics-inform", "physics inform", "pinn", "physics-guided", "physics constrain"],
            ),
            NormalizationRule::new("Surrogate Modeling", &[], &["surrogate", "emulat", "metamodel"]),
            NormalizationRule::new("Data Augmentation", &[], &["data augment"]),
            NormalizationRule::new(
                "Virtual Sample Generation",
                &[],
                &["virtual sample", "synthetic sample", "synthetic data"],
            ),
            NormalizationRule::new(
                "Active Learning / Adaptive Sampling",
                &[],
                &["active learn", "adaptive sampling", "adaptive sample"],
            ),
            NormalizationRule::new(
                "Few-Shot / Small-Data Learning",
                &[],
                &["few-shot", "few shot", "small sample", "small data", "low-data", "low data"],
            ),
            NormalizationRule::new(
                "Sparse Methods / Compressed Sensing",
                &[],
                &["sparse", "compressed sens", "compressive sens"],
            ),
            NormalizationRule::new(
                "Generative Models (GAN/VAE/Diffusion)",
                &["GAN", "VAE"],
                &["generative adversarial", "variational autoencod", "diffusion model"],
            ),
            NormalizationRule::new("Multi-Task Learning", &[], &["multi-task", "multitask"]),
            NormalizationRule::new(
                "Uncertainty Quantification / Bayesian Methods",
                &[],
                &["uncertainty", "bayesian", "probabilistic"],
            ),
        ])
    }

    /// Check every rule has a label and at least one pattern
    pub fn validate(&self) -> Result<(), String> {
        for (i, rule) in self.0.iter().enumerate() {
            if rule.label.trim().is_empty() {
                return Err(format!("rule {} has an empty label", i + 1));
            }
            if rule.exact.is_empty() && rule.contains.is_empty() {
                return Err(format!("rule '{}' has no patterns", rule.label));
            }
        }
        Ok(())
    }
}

/// Method and technique tables used by the aggregator
///
/// Loadable from TOML so the taxonomy can follow the collection:
///
/// ```toml
/// [[methods]]
/// label = "Neural Network / ANN"
/// exact = ["ANN", "MLP"]
///
/// [[techniques]]
/// label = "Transfer Learning"
/// contains = ["transfer learn", "fine-tun"]
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Normalizer {
    /// Rules for `methods` entries
    #[serde(default = "NormalizationRules::default_methods")]
    pub methods: NormalizationRules,

    /// Rules for `techniques` entries
    #[serde(default = "NormalizationRules::default_techniques")]
    pub techniques: NormalizationRules,
}

impl Default for Normalizer {
    fn default() -> Self {
        Self {
            methods: NormalizationRules::default_methods(),
            techniques: NormalizationRules::default_techniques(),
        }
    }
}

impl Normalizer {
    /// Normalize every method name, dropping empty ones
    pub fn methods<'a>(&'a self, names: &'a [String]) -> impl Iterator<Item = String> + 'a {
        names.iter().filter_map(|name| self.methods.normalize(name))
    }

    /// Normalize every technique name, dropping empty ones
    pub fn techniques<'a>(&'a self, names: &'a [String]) -> impl Iterator<Item = String> + 'a {
        names.iter().filter_map(|name| self.techniques.normalize(name))
    }

    /// Validate both tables
    pub fn validate(&self) -> Result<(), String> {
        self.methods.validate().map_err(|e| format!("methods: {}", e))?;
        self.techniques.validate().map_err(|e| format!("techniques: {}", e))
    }

    /// Load rule tables from TOML; a missing table keeps the built-in one
    pub fn from_toml(toml_str: &str) -> Result<Self, String> {
        let normalizer: Self =
            toml::from_str(toml_str).map_err(|e| format!("Failed to parse TOML: {}", e))?;
        normalizer.validate()?;
        Ok(normalizer)
    }

    /// Serialize rule tables to TOML
    pub fn to_toml(&self) -> Result<String, String> {
        toml::to_string_pretty(self).map_err(|e| format!("Failed to serialize to TOML: {}", e))
    }
}
