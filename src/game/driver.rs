//! Fictitious Play
//!
//! The game loop: every iteration the auditor best-responds to the learner's mixed
//! classifier and the learner best-responds to the costs the auditor's findings have
//! accumulated.
use super::history::{GameHistory, IterationRecord, ParetoPoint};
use super::state::GameState;
use crate::auditor::Auditor;
use crate::average::{evaluate_average, running_average};
use crate::config::GameConfig;
use crate::constants::HEATMAP_ATTRIBUTES;
use crate::cost::CostUpdate;
use crate::data::Dataset;
use crate::errors::FairnessError;
use crate::learner::CostSensitiveLearner;
use crate::metric::{as_f64, false_positive_rate, marginal_unfairness};
use crate::oracle::DecisionOracle;
use crate::observer::Observers;
use crate::utils::fmt_vec_output;
use log::{debug, info, warn};
use rayon::prelude::*;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Colour range of the iteration 1 heat map, reused by later ones.
pub type HeatScale = Option<(f64, f64)>;

/// Fictitious-play driver.
#[derive(Debug, Clone, Default)]
pub struct FictitiousPlay {
    pub cfg: GameConfig,
    stop: Option<Arc<AtomicBool>>,
}

impl FictitiousPlay {
    /// Create a driver, validating the configuration.
    pub fn new(cfg: GameConfig) -> Result<Self, FairnessError> {
        cfg.validate_parameters()?;
        Ok(FictitiousPlay { cfg, stop: None })
    }

    /// Attach a flag that, once set, ends the run after the iteration in progress.
    pub fn with_stop_flag(mut self, stop: Arc<AtomicBool>) -> Self {
        self.stop = Some(stop);
        self
    }

    fn stop_requested(&self) -> bool {
        self.stop.as_ref().map_or(false, |s| s.load(Ordering::Relaxed))
    }

    /// Run the game without observers.
    pub fn fit<A: Auditor + ?Sized>(&self, data: &Dataset, auditor: &A) -> Result<GameHistory, FairnessError> {
        self.fit_observed(data, auditor, &mut Observers::default())
    }

    /// Run the game from the learner's best response to uniform costs until
    /// `max_iters`, playing `max_iters - 1` rounds.
    ///
    /// * `data` - The fairness problem.
    /// * `auditor` - Subgroup discovery oracle.
    /// * `observers` - Heat map and plot collaborators, failures are logged and skipped.
    pub fn fit_observed<A: Auditor + ?Sized>(
        &self,
        data: &Dataset,
        auditor: &A,
        observers: &mut Observers,
    ) -> Result<GameHistory, FairnessError> {
        self.cfg.validate_parameters()?;
        if data.negatives().is_empty() {
            return Err(FairnessError::NoNegativeExamples);
        }
        let start = Instant::now();
        let learner = CostSensitiveLearner::new(self.cfg.regression);
        let uniform = GameState::uniform_costs(data.rows(), data.negatives().len());
        let seed = learner.best_response(&uniform, data)?;
        let mut state = GameState::initial(data, seed)?;
        let mut history = GameHistory::new(data.rows());
        let mut scale: HeatScale = None;

        while state.iteration < self.cfg.max_iters {
            let (next, record) = self.step(state, data, auditor, &learner, observers, &mut scale)?;
            history.push(record);
            state = next;
            if self.stop_requested() && state.iteration < self.cfg.max_iters {
                info!("Stop requested, ending the game after iteration {}.", state.iteration - 1);
                history.stopped_early = true;
                break;
            }
        }

        if self.cfg.plots {
            if let Some(plotter) = observers.plotter.as_deref_mut() {
                let errors = history.errors();
                let fp_diffs = history.fp_disparities();
                if let Err(e) = plotter.plot_single(&errors, &fp_diffs, self.cfg.max_iters, self.cfg.gamma, self.cfg.c) {
                    warn!("Skipping trajectory plot: {}", e);
                }
            }
        }

        info!(
            "Finished {} rounds of fictitious play in {} seconds, covered fraction {:.4}.",
            history.len(),
            start.elapsed().as_secs_f32(),
            history.covered_fraction()
        );
        Ok(history)
    }

    /// Play iteration `state.iteration` and return the next state with its statistics.
    pub fn step<A: Auditor + ?Sized>(
        &self,
        state: GameState,
        data: &Dataset,
        auditor: &A,
        learner: &CostSensitiveLearner,
        observers: &mut Observers,
        scale: &mut HeatScale,
    ) -> Result<(GameState, IterationRecord), FairnessError> {
        let t = state.iteration;
        let parallel = self.cfg.parallel;
        let negatives = data.negatives();

        // Mixed classifier including the latest learner.
        let (error, a) = evaluate_average(&state.learner, data, &state.a, t, parallel)?;

        if self.cfg.heatmap && self.cfg.heatmap_iter > 0 && t % self.cfg.heatmap_iter == 0 {
            self.render_heat_map(data, &a, t, observers, scale);
        }

        let fp = running_average(state.fp, Self::negative_rate(&state.learner, data, parallel)?, t);
        let audit = auditor.get_group(&a, data, fp)?;

        let group_all = audit.group.predict(&data.x_prime, parallel)?;
        let group_membership = state.cover(&group_all);
        let covered = group_membership.iter().filter(|g| **g).count();
        let members_0 = negatives.gather(&group_all);
        let group_size = members_0.iter().filter(|g| **g == 1).count() as f64 / data.rows() as f64;

        let next_learner = learner.best_response(&state.costs, data)?;
        let learner_fp = Self::negative_rate(&next_learner, data, parallel)?;

        let record = IterationRecord {
            iteration: t,
            error,
            fp_disparity: audit.disparity.abs(),
            group_size,
            coefficients: audit.group.coefficient_delta(),
            covered,
            fp,
            learner_fp,
            marginal_unfairness: marginal_unfairness(&a, &data.x_prime, data.y, fp),
        };
        self.log_iteration(&record, data.rows());

        let costs = CostUpdate {
            c: self.cfg.c,
            iteration: t,
            fp_disparity: audit.disparity,
            gamma: self.cfg.gamma,
        }
        .apply(&state.costs, &members_0, audit.sign, data.rows())?;

        let next = GameState {
            iteration: t + 1,
            a,
            fp,
            costs,
            group_membership,
            learner: next_learner,
        };
        Ok((next, record))
    }

    /// False positive rate of a single classifier.
    fn negative_rate(q: &DecisionOracle, data: &Dataset, parallel: bool) -> Result<f64, FairnessError> {
        let preds = as_f64(&q.predict(&data.x, parallel)?);
        Ok(false_positive_rate(&preds, data.negatives()))
    }

    fn render_heat_map(&self, data: &Dataset, a: &[f64], t: usize, observers: &mut Observers, scale: &mut HeatScale) {
        let visualizer = match observers.visualizer.as_deref_mut() {
            Some(v) => v,
            None => return,
        };
        let path = format!("{}/heatmap_iteration_{}", self.cfg.heatmap_dir, t);
        let x_prime = data.x_prime.leading_columns(HEATMAP_ATTRIBUTES);
        let (vmin, vmax) = match scale {
            Some((lo, hi)) => (Some(*lo), Some(*hi)),
            None => (None, None),
        };
        match visualizer.heat_map(&data.x, &x_prime, data.y, a, self.cfg.heatmap_eta, &path, vmin, vmax) {
            Ok(range) => {
                if t == 1 {
                    *scale = Some(range);
                }
            }
            Err(e) => warn!("Skipping heat map for iteration {}: {}", t, e),
        }
    }

    fn log_iteration(&self, record: &IterationRecord, n_rows: usize) {
        if record.iteration == 1 {
            info!(
                "most accurate classifier error: {:.6}, most acc-class unfairness: {:.6}, most acc-class size: {:.6}",
                record.error, record.fp_disparity, record.group_size
            );
        }
        let verbose = self.cfg.print_output
            && self.cfg.log_iterations > 0
            && record.iteration % self.cfg.log_iterations == 0;
        if verbose {
            info!(
                "iteration: {}, ave error: {:.6}, gamma-unfairness: {:.6}, group_size: {:.6}, frac included ppl: {:.6}",
                record.iteration,
                record.error,
                record.fp_disparity,
                record.group_size,
                record.covered as f64 / n_rows as f64
            );
        }
        debug!(
            "iteration: {}, marginal unfairness: [{}]",
            record.iteration,
            fmt_vec_output(&record.marginal_unfairness)
        );
    }

    /// Run one game per tolerance and report the final error and disparity of each.
    ///
    /// Runs are independent; with `parallel` set they execute concurrently.
    pub fn pareto<A: Auditor + ?Sized>(
        &self,
        data: &Dataset,
        auditor: &A,
        gamma_list: &[f64],
    ) -> Result<Vec<ParetoPoint>, FairnessError> {
        if self.cfg.max_iters < 2 {
            return Err(FairnessError::InvalidParameter(
                "max_iters".to_string(),
                "at least 2 for a tolerance sweep".to_string(),
                self.cfg.max_iters.to_string(),
            ));
        }
        let run = |gamma: &f64| -> Result<ParetoPoint, FairnessError> {
            let game = FictitiousPlay {
                cfg: self.cfg.clone().set_gamma(*gamma).set_heatmap(false).set_plots(false),
                stop: self.stop.clone(),
            };
            let history = game.fit(data, auditor)?;
            let last = history.last().ok_or(FairnessError::EmptyData)?;
            Ok(ParetoPoint {
                gamma: *gamma,
                error: last.error,
                fp_disparity: last.fp_disparity,
            })
        };
        let points = if self.cfg.parallel {
            gamma_list.par_iter().map(run).collect::<Result<Vec<_>, _>>()?
        } else {
            gamma_list.iter().map(run).collect::<Result<Vec<_>, _>>()?
        };
        info!(
            "Pareto sweep errors: [{}], disparities: [{}]",
            fmt_vec_output(&points.iter().map(|p| p.error).collect::<Vec<_>>()),
            fmt_vec_output(&points.iter().map(|p| p.fp_disparity).collect::<Vec<_>>())
        );
        Ok(points)
    }
}

/// Run fictitious play with the given configuration and return the per-iteration
/// errors and disparity magnitudes.
pub fn fictitious_play<A: Auditor + ?Sized>(
    data: &Dataset,
    auditor: &A,
    cfg: GameConfig,
) -> Result<(Vec<f64>, Vec<f64>), FairnessError> {
    let history = FictitiousPlay::new(cfg)?.fit(data, auditor)?;
    Ok((history.errors(), history.fp_disparities()))
}
