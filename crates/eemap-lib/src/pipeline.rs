//! Explicit stage driver for building the standard starmap.
//!
//! Stages run in order `raw -> enriched -> standard`. Every produced stage is
//! stored in the cache; a stage that cannot be restored is rebuilt from the
//! data source.

use tracing::{debug, info, warn};

use crate::cache::{Stage, StageCache};
use crate::db::StarmapSource;
use crate::error::Result;
use crate::graph::build_from_source;
use crate::partition::prune_isolated;
use crate::production::{attach_production, derive_edge_production};
use crate::starmap::Starmap;

/// Builds the standard starmap from a data source through a stage cache.
#[derive(Debug)]
pub struct StarmapPipeline<S, C> {
    source: S,
    cache: C,
}

impl<S: StarmapSource, C: StageCache> StarmapPipeline<S, C> {
    pub fn new(source: S, cache: C) -> Self {
        Self { source, cache }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn cache(&self) -> &C {
        &self.cache
    }

    /// Return the cached standard graph when every stage is present and the
    /// standard snapshot decodes. Otherwise rebuild from scratch.
    pub fn load(&self) -> Result<Starmap> {
        let complete = Stage::ALL.iter().all(|&stage| self.cache.contains(stage));
        if complete {
            if let Some(starmap) = self.cache.load(Stage::Standard) {
                info!(
                    systems = starmap.node_count(),
                    edges = starmap.edge_count(),
                    "using cached standard starmap"
                );
                return Ok(starmap);
            }
            warn!("standard snapshot unreadable, rebuilding");
        } else {
            debug!("stage cache incomplete, rebuilding");
        }
        self.run_from(Stage::Raw)
    }

    /// Run the pipeline starting at `stage` and return the standard graph.
    ///
    /// `stage` is the first stage to produce. Its input is restored from the
    /// cache, and only while every earlier stage is still present. Otherwise
    /// the whole pipeline runs from `Raw`.
    pub fn run_from(&self, stage: Stage) -> Result<Starmap> {
        let mut starmap = match stage.previous() {
            None => self.build_raw()?,
            Some(previous) => {
                if let Some(missing) = self.first_missing_before(stage) {
                    warn!(stage = %missing, "missing cached stage, rebuilding from source");
                    return self.run_from(Stage::Raw);
                }
                match self.cache.load(previous) {
                    Some(restored) => restored,
                    None => {
                        warn!(stage = %previous, "unreadable cached stage, rebuilding from source");
                        return self.run_from(Stage::Raw);
                    }
                }
            }
        };

        if stage <= Stage::Enriched {
            self.enrich(&mut starmap)?;
            self.cache.store(Stage::Enriched, &starmap)?;
        }

        let removed = prune_isolated(&mut starmap);
        info!(
            removed,
            systems = starmap.node_count(),
            edges = starmap.edge_count(),
            "standard starmap ready"
        );
        self.cache.store(Stage::Standard, &starmap)?;
        Ok(starmap)
    }

    fn first_missing_before(&self, stage: Stage) -> Option<Stage> {
        Stage::ALL
            .into_iter()
            .take_while(|&earlier| earlier < stage)
            .find(|&earlier| !self.cache.contains(earlier))
    }

    fn build_raw(&self) -> Result<Starmap> {
        let starmap = build_from_source(&self.source)?;
        self.cache.store(Stage::Raw, &starmap)?;
        Ok(starmap)
    }

    fn enrich(&self, starmap: &mut Starmap) -> Result<()> {
        attach_production(starmap, &self.source)?;
        derive_edge_production(starmap);
        Ok(())
    }
}
