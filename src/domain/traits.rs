// ============================================================
// Layer 3: Core Traits (Abstractions)
// ============================================================
// The pipeline reads its inputs through these traits, so the
// application layer works the same with the TSV loaders and
// with in-memory sources in tests.
//
// Implementations:
//   - ContigDirLoader  → ContigSource (one TSV file per contig)
//   - AnnotationTable  → AnnotationSource (interval table)

use anyhow::Result;

use crate::domain::contig::{Annotation, RawContig};

// ─── ContigSource ─────────────────────────────────────────────────────────────
/// Any component that can provide the raw contigs.
pub trait ContigSource {
    /// Load every contig, ordered by origin.
    fn load_all(&self) -> Result<Vec<RawContig>>;
}

// ─── AnnotationSource ─────────────────────────────────────────────────────────
/// Any component that can provide positive-interval annotations.
pub trait AnnotationSource {
    fn load_annotations(&self) -> Result<Vec<Annotation>>;
}

impl ContigSource for Vec<RawContig> {
    fn load_all(&self) -> Result<Vec<RawContig>> {
        let mut contigs = self.clone();
        contigs.sort_by(|a, b| a.origin.cmp(&b.origin));
        Ok(contigs)
    }
}

impl AnnotationSource for Vec<Annotation> {
    fn load_annotations(&self) -> Result<Vec<Annotation>> {
        Ok(self.clone())
    }
}
