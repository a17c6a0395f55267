use slotmap::new_key_type;

new_key_type! {
    /// Stable handle to a candidate inside the selection pool arena.
    pub struct CandidateId;
}
