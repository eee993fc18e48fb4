use meshweld_common::ArrayIndex;
use num_traits::AsPrimitive;

use crate::store::{AttributeStore, WeldReport, WeldSummary};

impl<Idx: ArrayIndex + Send> AttributeStore<Idx>
where
    usize: AsPrimitive<Idx>,
{
    /// As [weld_all](Self::weld_all), with each kind welded on its own scoped thread.
    ///
    /// Kinds share no memory, so no synchronization is needed beyond joining.
    #[tracing::instrument(skip(self), fields(triangles = self.triangles))]
    pub fn weld_all_parallel(&mut self) -> WeldSummary {
        let Self {
            positions,
            normals,
            tangents,
            binormals,
            colors,
            texcoords,
            ..
        } = self;

        let joined = crossbeam::scope(|s| {
            let handles = [
                s.spawn(move |_| positions.weld()),
                s.spawn(move |_| normals.weld()),
                s.spawn(move |_| tangents.weld()),
                s.spawn(move |_| binormals.weld()),
                s.spawn(move |_| colors.weld()),
                s.spawn(move |_| texcoords.weld()),
            ];
            handles
                .into_iter()
                .map(|h| h.join())
                .collect::<Result<Vec<Option<WeldReport>>, _>>()
        });

        match joined {
            Ok(Ok(reports)) => WeldSummary {
                reports: reports.into_iter().flatten().collect(),
            },
            // a weld only panics on a violated precondition; surface it on the caller's thread
            Ok(Err(payload)) | Err(payload) => std::panic::resume_unwind(payload),
        }
    }
}
