use crate::application::dto::{ComponentResolution, ResolveRequest, ResolveResponse};
use crate::dependency_resolution::policies::{OverridesConfig, WildcardPattern};
use crate::dependency_resolution::services::{
    DependencyResolver, ResolutionOutcome, VersionResolver,
};
use crate::ports::inbound::DependencyResolutionPort;
use crate::ports::outbound::{
    ComponentIdentityResolver, ComponentSnapshot, PackageResolver, PolicyProviderSet,
    ProgressReporter,
};
use crate::shared::Result;
use anyhow::Context;
use async_trait::async_trait;
use futures::stream::{self, StreamExt};

/// ResolveDependenciesUseCase - Resolves the dependencies of a batch of components
///
/// Every component of the batch is resolved against the same workspace
/// state: the injected bitmap, installed packages, policy sources and
/// override rules. Results come back in request order.
///
/// # Type Parameters
/// * `B` - ComponentIdentityResolver implementation (the bitmap)
/// * `P` - PackageResolver implementation
/// * `S` - PolicyProviderSet implementation
/// * `PR` - ProgressReporter implementation
pub struct ResolveDependenciesUseCase<B, P, S, PR> {
    bitmap: B,
    packages: P,
    policies: S,
    overrides: OverridesConfig,
    progress_reporter: PR,
}

impl<B, P, S, PR> ResolveDependenciesUseCase<B, P, S, PR>
where
    B: ComponentIdentityResolver,
    P: PackageResolver,
    S: PolicyProviderSet,
    PR: ProgressReporter,
{
    /// Creates a new ResolveDependenciesUseCase with injected dependencies
    pub fn new(
        bitmap: B,
        packages: P,
        policies: S,
        overrides: OverridesConfig,
        progress_reporter: PR,
    ) -> Self {
        Self {
            bitmap,
            packages,
            policies,
            overrides,
            progress_reporter,
        }
    }

    /// Executes the dependency resolution use case
    ///
    /// # Errors
    /// Fails on an invalid request, when component patterns select nothing,
    /// or when any component fails to resolve. Per-file problems are not
    /// errors; they end up in each component's issues.
    pub async fn execute(&self, request: ResolveRequest) -> Result<ResolveResponse> {
        request.validate()?;

        // Step 1: Select the components to resolve
        let selected = self.select_components(&request)?;
        if selected.is_empty() {
            self.progress_reporter
                .report_completion("✅ No components to resolve");
            return Ok(ResolveResponse::default());
        }

        // Step 2: Resolve every component, at most `concurrency` at a time
        let results = self.resolve_all(&selected, request.concurrency).await?;

        // Step 3: Report issues found in the batch
        self.report_issues(&results);

        // Step 4: Build and return response
        let response = ResolveResponse::new(results);
        self.progress_reporter.report_completion(&format!(
            "✅ Resolved {} component(s), {} with issues",
            response.results.len(),
            response.components_with_issues().count()
        ));
        Ok(response)
    }

    /// Keeps the components matched by the request patterns
    ///
    /// # Errors
    /// Returns an error if a pattern is invalid or if patterns were given
    /// and none of them matched
    fn select_components<'r>(
        &self,
        request: &'r ResolveRequest,
    ) -> Result<Vec<&'r ComponentSnapshot>> {
        self.progress_reporter.report(&format!(
            "📖 Loaded {} component(s) from the workspace snapshot",
            request.components.len()
        ));

        if request.component_patterns.is_empty() {
            return Ok(request.components.iter().collect());
        }

        let patterns = request
            .component_patterns
            .iter()
            .map(|p| WildcardPattern::parse(p))
            .collect::<std::result::Result<Vec<_>, _>>()?;
        let mut matched = vec![false; patterns.len()];

        let selected: Vec<&ComponentSnapshot> = request
            .components
            .iter()
            .filter(|snapshot| {
                let mut hit = false;
                for (index, pattern) in patterns.iter().enumerate() {
                    if pattern.matches_id(&snapshot.component.id) {
                        matched[index] = true;
                        hit = true;
                    }
                }
                hit
            })
            .collect();

        if selected.is_empty() {
            anyhow::bail!(
                "None of the {} component(s) matched the provided patterns. \
                 Please adjust your --component patterns.",
                request.components.len()
            );
        }

        for (pattern, matched) in patterns.iter().zip(matched) {
            if !matched {
                self.progress_reporter.report_error(&format!(
                    "⚠️  Warning: Component pattern '{}' did not match any component.",
                    pattern.as_str()
                ));
            }
        }

        self.progress_reporter.report(&format!(
            "🔎 Selected {} of {} component(s)",
            selected.len(),
            request.components.len()
        ));
        Ok(selected)
    }

    async fn resolve_all(
        &self,
        selected: &[&ComponentSnapshot],
        concurrency: usize,
    ) -> Result<Vec<ComponentResolution>> {
        self.progress_reporter.report(&format!(
            "🔗 Resolving dependencies of {} component(s)...",
            selected.len()
        ));

        let resolver = DependencyResolver::new(
            &self.bitmap,
            &self.packages,
            &self.policies,
            &self.overrides,
        );
        let total = selected.len();

        // `buffered` keeps request order while running ahead
        let mut resolutions = stream::iter(selected.iter().copied())
            .map(|snapshot| {
                let resolver = &resolver;
                async move {
                    let outcome = resolver
                        .resolve(&snapshot.component, &snapshot.dependency_tree)
                        .await
                        .with_context(|| {
                            format!(
                                "Failed to resolve dependencies of component \"{}\"",
                                snapshot.component.id
                            )
                        })?;
                    Ok::<_, anyhow::Error>(self.resolve_versions(snapshot, outcome))
                }
            })
            .buffered(concurrency);

        let mut results = Vec::with_capacity(total);
        while let Some(result) = resolutions.next().await {
            match result {
                Ok(resolution) => {
                    self.progress_reporter.report_progress(
                        results.len() + 1,
                        total,
                        Some(&resolution.id.to_string()),
                    );
                    results.push(resolution);
                }
                Err(e) => {
                    self.progress_reporter
                        .report_error(&format!("❌ {}", e));
                    return Err(e);
                }
            }
        }
        Ok(results)
    }

    /// Gives the resolved dependencies and the extensions concrete versions
    fn resolve_versions(
        &self,
        snapshot: &ComponentSnapshot,
        outcome: ResolutionOutcome,
    ) -> ComponentResolution {
        let ResolutionOutcome {
            mut data,
            mut debug,
            pinned_versions,
        } = outcome;
        let component = &snapshot.component;
        let mut extensions = component.extensions.clone();

        VersionResolver::new(&self.bitmap, component.model.as_ref(), &pinned_versions).resolve(
            &mut data.dependencies,
            &mut extensions,
            Some(&mut debug),
        );

        ComponentResolution {
            id: component.id.clone(),
            data,
            extensions,
            debug,
        }
    }

    fn report_issues(&self, results: &[ComponentResolution]) {
        for result in results.iter().filter(|r| r.data.has_issues()) {
            let kinds: Vec<&str> = result
                .data
                .issues
                .kinds()
                .iter()
                .map(|kind| kind.description())
                .collect();
            self.progress_reporter.report_error(&format!(
                "⚠️  Warning: {} has issues: {}",
                result.id,
                kinds.join(", ")
            ));

            let issues = &result.data.issues;
            for (file, error) in &issues.parse_errors {
                self.progress_reporter.report_error(&format!(
                    "   - failed parsing {} of {}: {}",
                    file, result.id, error
                ));
            }
            for (file, error) in &issues.resolve_errors {
                self.progress_reporter.report_error(&format!(
                    "   - failed resolving {} of {}: {}",
                    file, result.id, error
                ));
            }
        }
    }
}

#[async_trait(?Send)]
impl<B, P, S, PR> DependencyResolutionPort for ResolveDependenciesUseCase<B, P, S, PR>
where
    B: ComponentIdentityResolver,
    P: PackageResolver,
    S: PolicyProviderSet,
    PR: ProgressReporter,
{
    async fn resolve_dependencies(&self, request: ResolveRequest) -> Result<ResolveResponse> {
        self.execute(request).await
    }
}
