// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Review session — one document, its findings, and everything the reviewer
// has done to it so far.
//
// The session owns the revision ledger and the hover highlight. Overlays are
// recomputed from the ledger on demand, so every read reflects the latest
// accepted rewrite.

use std::sync::Arc;

use redline_core::analysis::Analyzer;
use redline_core::error::{RedlineError, Result};
use redline_core::types::{DocumentOrigin, FindingId, FindingSet};
use redline_core::RedlineConfig;
use redline_document::{
    ExportArtifact, ExportGate, ExportPipeline, Exporter, PreviewHandle, PreviewRegistry,
    PreviewSlot, TextExtractor,
};
use redline_overlay::{FindingCard, Highlight, Revision, RevisionLedger, Segment};
use tracing::{info, instrument, warn};

use crate::state::{ExportProgress, ViewMode};

pub struct ReviewSession {
    config: RedlineConfig,
    origin: Option<DocumentOrigin>,
    original_text: String,
    findings: FindingSet,
    ledger: RevisionLedger,
    highlight: Highlight,
    previews: PreviewRegistry,
    preview: PreviewSlot,
    exporter: Exporter,
    view_mode: ViewMode,
    export_progress: ExportProgress,
}

impl ReviewSession {
    pub fn new(config: RedlineConfig) -> Self {
        let ledger = RevisionLedger::new(String::new(), &config.matching);
        let exporter = Exporter::new(ExportPipeline::new(config.export.clone()));
        Self {
            config,
            origin: None,
            original_text: String::new(),
            findings: FindingSet::default(),
            ledger,
            highlight: Highlight::new(),
            previews: PreviewRegistry::new(),
            preview: PreviewSlot::new(),
            exporter,
            view_mode: ViewMode::default(),
            export_progress: ExportProgress::default(),
        }
    }

    /// Extract, analyze, and start reviewing a new document.
    ///
    /// On failure the session is left empty rather than showing the previous
    /// document against new findings.
    #[instrument(skip_all, fields(file = %origin.file_name, bytes_len = bytes.len()))]
    pub fn load(
        &mut self,
        bytes: Vec<u8>,
        origin: DocumentOrigin,
        extractor: &dyn TextExtractor,
        analyzer: &dyn Analyzer,
    ) -> Result<()> {
        let loaded = extractor
            .extract(&bytes, &origin)
            .and_then(|text| analyzer.analyze(&text).map(|findings| (text, findings)));

        match loaded {
            Ok((text, findings)) => {
                self.preview
                    .replace(self.previews.acquire(&origin, Arc::from(bytes)));
                self.start(text, origin, findings);
                Ok(())
            }
            Err(err) => {
                warn!(%err, "document could not be loaded");
                self.clear();
                Err(err)
            }
        }
    }

    /// Start reviewing text that is already extracted and analyzed.
    pub fn load_text(&mut self, text: impl Into<String>, origin: DocumentOrigin, findings: FindingSet) {
        self.preview.clear();
        self.start(text.into(), origin, findings);
    }

    fn start(&mut self, text: String, origin: DocumentOrigin, findings: FindingSet) {
        info!(
            format = ?origin.format,
            chars = text.len(),
            findings = findings.len(),
            "review started"
        );
        self.ledger = RevisionLedger::new(text.clone(), &self.config.matching);
        self.original_text = text;
        self.origin = Some(origin);
        self.findings = findings;
        self.highlight.leave();
        self.export_progress = ExportProgress::default();
    }

    /// Drop the document, its findings, and its preview.
    pub fn clear(&mut self) {
        self.origin = None;
        self.original_text.clear();
        self.findings = FindingSet::default();
        self.ledger.reset(String::new());
        self.highlight.leave();
        self.preview.clear();
    }

    pub fn origin(&self) -> Option<&DocumentOrigin> {
        self.origin.as_ref()
    }

    pub fn findings(&self) -> &FindingSet {
        &self.findings
    }

    pub fn ledger(&self) -> &RevisionLedger {
        &self.ledger
    }

    pub fn buffer(&self) -> &str {
        self.ledger.buffer()
    }

    pub fn preview(&self) -> Option<&PreviewHandle> {
        self.preview.current()
    }

    pub fn previews(&self) -> &PreviewRegistry {
        &self.previews
    }

    /// Headline for the findings panel.
    pub fn summary(&self) -> String {
        self.findings.summary()
    }

    /// Current overlay of the buffer.
    pub fn segments(&self) -> Vec<Segment<'_>> {
        self.ledger.segments(&self.findings)
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn set_view_mode(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    // -- Highlight ------------------------------------------------------------

    pub fn hover(&mut self, id: FindingId) {
        self.highlight.hover(id);
    }

    pub fn leave(&mut self) {
        self.highlight.leave();
    }

    /// Card for the highlighted finding, if it is still on screen.
    pub fn active_card(&mut self) -> Option<FindingCard> {
        let segments = self.ledger.segments(&self.findings);
        self.highlight.retain(&segments);
        let id = self.highlight.active()?;
        self.findings.get(id).map(|finding| FindingCard::new(id, finding))
    }

    /// Cards for every finding on screen, in document order.
    pub fn cards(&self) -> Vec<FindingCard> {
        self.segments()
            .iter()
            .filter_map(|segment| segment.finding())
            .map(|(id, finding)| FindingCard::new(id, finding))
            .collect()
    }

    // -- Revisions ------------------------------------------------------------

    /// Apply the rewrite of finding `id`. The highlight is dropped either way.
    pub fn accept(&mut self, id: FindingId) -> Result<Revision> {
        self.highlight.leave();
        self.ledger.accept(&self.findings, id)
    }

    /// Apply every rewrite still on offer, in document order.
    ///
    /// Each finding is attempted against the buffer as the previous ones left
    /// it; failures are reported per finding and do not stop the rest.
    pub fn accept_all(&mut self) -> Vec<(FindingId, Result<Revision>)> {
        let offered: Vec<FindingId> = self
            .cards()
            .into_iter()
            .filter(|card| card.can_apply)
            .map(|card| card.id)
            .collect();
        offered
            .into_iter()
            .map(|id| (id, self.accept(id)))
            .collect()
    }

    /// Undo every accepted rewrite.
    pub fn revert_all(&mut self) {
        self.ledger.reset(self.original_text.clone());
        self.highlight.leave();
    }

    // -- Export ---------------------------------------------------------------

    pub fn export_progress(&self) -> &ExportProgress {
        &self.export_progress
    }

    pub fn export_gate(&self) -> &ExportGate {
        self.exporter.gate()
    }

    /// Start exporting the buffer as it is now.
    ///
    /// The returned future owns a snapshot, so the session stays usable while
    /// the export runs. Report the outcome with [`Self::finish_export`].
    /// While another export holds the gate the progress is left untouched and
    /// the future resolves to `ExportInProgress`.
    pub fn export(&mut self) -> impl Future<Output = Result<ExportArtifact>> + Send + use<> {
        let exporter = self.exporter.clone();
        let job = self
            .origin
            .clone()
            .map(|origin| (self.ledger.snapshot(), origin));
        if !exporter.gate().is_busy() {
            self.export_progress = ExportProgress::rendering();
        }

        async move {
            let (snapshot, origin) = job.ok_or_else(|| {
                RedlineError::ExportFailure("no document is loaded".into())
            })?;
            exporter.export(snapshot, origin).await
        }
    }

    /// Record the outcome of [`Self::export`]. A rejected trigger belongs to
    /// the export still running, so it does not change the progress.
    pub fn finish_export(&mut self, result: &Result<ExportArtifact>) {
        if matches!(result, Err(RedlineError::ExportInProgress)) {
            warn!("export already running, trigger ignored");
            return;
        }
        self.export_progress = ExportProgress::finished(result);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::ExportStage;
    use redline_core::types::{Finding, Severity};
    use redline_document::{DefaultExtractor, PreviewKind};

    const NDA: &str = "The Recipient may disclose Confidential Information to any third party.";

    fn nda_findings() -> FindingSet {
        FindingSet::new(vec![
            Finding::new(
                "to any third party.",
                Severity::High,
                "Unlimited disclosure",
                "Restrict recipients",
            )
            .with_rewrite("only to Representatives bound by confidentiality.")
            .with_clause(Some("3"), Some("Permitted Disclosure")),
            Finding::new("Recipient", Severity::Low, "Undefined party", "Define it"),
        ])
    }

    fn session() -> ReviewSession {
        let mut session = ReviewSession::new(RedlineConfig::default());
        session.load_text(NDA, DocumentOrigin::new("nda.txt", None), nda_findings());
        session
    }

    struct FixedAnalyzer(FindingSet);

    impl Analyzer for FixedAnalyzer {
        fn analyze(&self, _text: &str) -> Result<FindingSet> {
            Ok(self.0.clone())
        }
    }

    struct FailingAnalyzer;

    impl Analyzer for FailingAnalyzer {
        fn analyze(&self, _text: &str) -> Result<FindingSet> {
            Err(RedlineError::Upstream("model unavailable".into()))
        }
    }

    #[test]
    fn overlay_lists_findings_in_document_order() {
        let session = session();
        let ids: Vec<_> = session.cards().iter().map(|card| card.id).collect();
        assert_eq!(ids, vec![FindingId(1), FindingId(0)]);
        assert_eq!(session.summary(), "2 potential risks identified");
    }

    #[test]
    fn accept_rewrites_and_clears_highlight() {
        let mut session = session();
        session.hover(FindingId(0));
        assert_eq!(
            session.active_card().and_then(|card| card.clause),
            Some("Clause 3: Permitted Disclosure".to_owned())
        );

        session.accept(FindingId(0)).expect("accept");
        assert_eq!(session.active_card(), None);
        assert!(session
            .buffer()
            .ends_with("Confidential Information only to Representatives bound by confidentiality."));
        assert_eq!(session.cards().len(), 1);
    }

    #[test]
    fn accept_all_skips_findings_without_rewrite() {
        let mut session = session();
        let outcomes = session.accept_all();
        assert_eq!(outcomes.len(), 1);
        assert!(outcomes[0].1.is_ok());
        assert!(session.ledger().is_accepted(FindingId(0)));
    }

    #[test]
    fn revert_restores_original() {
        let mut session = session();
        session.accept(FindingId(0)).expect("accept");
        session.revert_all();
        assert_eq!(session.buffer(), NDA);
        assert!(session.ledger().accepted().is_empty());
    }

    #[test]
    fn load_acquires_preview_and_replaces_previous() {
        let mut session = ReviewSession::new(RedlineConfig::default());
        let analyzer = FixedAnalyzer(nda_findings());

        session
            .load(
                NDA.as_bytes().to_vec(),
                DocumentOrigin::new("nda.txt", None),
                &DefaultExtractor,
                &analyzer,
            )
            .expect("load");
        let first = session.preview().map(PreviewHandle::id).expect("preview");
        assert_eq!(
            session.preview().map(PreviewHandle::kind),
            Some(PreviewKind::DownloadOnly)
        );

        session
            .load(
                NDA.as_bytes().to_vec(),
                DocumentOrigin::new("again.txt", None),
                &DefaultExtractor,
                &analyzer,
            )
            .expect("reload");
        assert!(!session.previews().is_live(first));
        assert_eq!(session.previews().live_count(), 1);
    }

    #[test]
    fn failed_load_clears_session() {
        let mut session = session();
        let err = session
            .load(
                NDA.as_bytes().to_vec(),
                DocumentOrigin::new("nda.txt", None),
                &DefaultExtractor,
                &FailingAnalyzer,
            )
            .expect_err("analysis fails");
        assert!(matches!(err, RedlineError::Upstream(_)));
        assert!(session.origin().is_none());
        assert!(session.findings().is_empty());
        assert_eq!(session.buffer(), "");
        assert_eq!(session.previews().live_count(), 0);
    }

    #[tokio::test]
    async fn export_uses_snapshot_taken_at_trigger() {
        let mut session = session();
        let pending = session.export();
        assert_eq!(session.export_progress().stage, ExportStage::Rendering);

        // Edits made while the export runs do not leak into it.
        session.accept(FindingId(0)).expect("accept");

        let result = pending.await;
        session.finish_export(&result);
        let artifact = result.expect("export");
        assert_eq!(artifact.file_name, "nda-revised.txt");
        assert_eq!(artifact.bytes, NDA.as_bytes());
        assert_eq!(session.export_progress().stage, ExportStage::Complete);
    }

    #[tokio::test]
    async fn export_without_document_fails() {
        let mut session = ReviewSession::new(RedlineConfig::default());
        let result = session.export().await;
        assert!(matches!(result, Err(RedlineError::ExportFailure(_))));
        session.finish_export(&result);
        assert_eq!(session.export_progress().stage, ExportStage::Failed);
    }

    #[tokio::test]
    async fn busy_gate_leaves_progress_alone() {
        let mut session = session();
        let ticket = session.export_gate().try_acquire().expect("gate");

        let pending = session.export();
        assert_eq!(session.export_progress().stage, ExportStage::Idle);

        let result = pending.await;
        assert!(matches!(result, Err(RedlineError::ExportInProgress)));
        session.finish_export(&result);
        assert_eq!(session.export_progress().stage, ExportStage::Idle);

        drop(ticket);
        let result = session.export().await;
        session.finish_export(&result);
        assert_eq!(session.export_progress().stage, ExportStage::Complete);
    }
}
