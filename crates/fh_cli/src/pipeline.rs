use std::fmt;
use std::time::{Duration, Instant};

use fh_core::logging::StageLogger;
use fh_core::{BatchReport, Error, PipelineConfig, Result};

/// One step of the pipeline, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Fetch,
    Process,
    Affiliate,
    Render,
    Sitemap,
}

impl Stage {
    pub const ALL: [Stage; 5] = [Stage::Fetch, Stage::Process, Stage::Affiliate, Stage::Render, Stage::Sitemap];

    pub fn name(self) -> &'static str {
        match self {
            Stage::Fetch => "fetch",
            Stage::Process => "process",
            Stage::Affiliate => "affiliate",
            Stage::Render => "render",
            Stage::Sitemap => "sitemap",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            Stage::Fetch => "RSS feed collection",
            Stage::Process => "Content processing",
            Stage::Affiliate => "Affiliate link generation",
            Stage::Render => "Site generation",
            Stage::Sitemap => "Sitemap generation",
        }
    }

    pub async fn run(self, config: &PipelineConfig) -> Result<BatchReport> {
        match self {
            Stage::Fetch => fh_fetch::run(config).await,
            Stage::Process => fh_process::run(config),
            Stage::Affiliate => fh_affiliate::run(config),
            Stage::Render => fh_render::run(config),
            Stage::Sitemap => fh_render::run_sitemap(config),
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[derive(Debug)]
pub struct StepResult {
    pub stage: Stage,
    pub duration: Duration,
    pub outcome: Result<BatchReport>,
}

impl StepResult {
    pub fn succeeded(&self) -> bool {
        self.outcome.is_ok()
    }
}

#[derive(Debug, Default)]
pub struct PipelineReport {
    pub steps: Vec<StepResult>,
    pub total_duration: Duration,
}

impl PipelineReport {
    pub fn successful(&self) -> usize {
        self.steps.iter().filter(|s| s.succeeded()).count()
    }

    pub fn failed(&self) -> usize {
        self.steps.len() - self.successful()
    }

    pub fn success_rate(&self) -> f64 {
        if self.steps.is_empty() {
            return 0.0;
        }
        self.successful() as f64 / self.steps.len() as f64 * 100.0
    }

    /// The error of the step that stopped the run, if any.
    pub fn failure(&self) -> Option<&Error> {
        self.steps.iter().find_map(|s| s.outcome.as_ref().err())
    }

    pub fn log(&self, logger: &StageLogger) {
        logger.info("==================== EXECUTION REPORT ====================");
        logger.info(&format!("Total time: {:.2}s", self.total_duration.as_secs_f64()));
        logger.info(&format!(
            "Steps: {} run, {} successful, {} failed ({:.1}%)",
            self.steps.len(),
            self.successful(),
            self.failed(),
            self.success_rate()
        ));
        for step in &self.steps {
            let secs = step.duration.as_secs_f64();
            match &step.outcome {
                Ok(report) => logger.info(&format!(
                    "  ✅ {:<10} {:>7.2}s  {} processed, {} skipped",
                    step.stage.name(),
                    secs,
                    report.processed,
                    report.skipped_count()
                )),
                Err(e) => logger.error(&format!("  ❌ {:<10} {:>7.2}s  {}", step.stage.name(), secs, e)),
            }
        }
    }
}

/// Runs `stages` in order and stops at the first failure. Later stages read
/// what earlier ones wrote, so nothing runs past a broken step.
pub async fn run_stages(config: &PipelineConfig, stages: &[Stage]) -> PipelineReport {
    let logger = StageLogger::for_stage("pipeline");
    let started = Instant::now();
    let mut report = PipelineReport::default();

    for (i, stage) in stages.iter().enumerate() {
        logger.info(&format!("🚀 Step {}/{}: {} ({})", i + 1, stages.len(), stage.description(), stage));
        let step_started = Instant::now();
        let outcome = stage.run(config).await;
        let duration = step_started.elapsed();

        match &outcome {
            Ok(_) => logger.info(&format!("✨ {} finished in {:.2}s", stage, duration.as_secs_f64())),
            Err(e) => logger.error(&format!("{} failed after {:.2}s: {}", stage, duration.as_secs_f64(), e)),
        }
        let failed = outcome.is_err();
        report.steps.push(StepResult {
            stage: *stage,
            duration,
            outcome,
        });
        if failed {
            break;
        }
    }

    report.total_duration = started.elapsed();
    report
}
