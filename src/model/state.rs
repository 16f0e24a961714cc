/// Marker for a model that is **not yet trained**.
///
/// `LinearModel<B, Unfitted>` implements [`TrainableModel`](super::TrainableModel)
/// only, so it cannot be used for prediction.
#[derive(Clone, Copy, Debug)]
pub struct Unfitted;

/// Marker for a **trained** model.
///
/// A fitted model holds only inference parameters: no optimizer state, loss
/// function or solver settings.
#[derive(Clone, Copy, Debug)]
pub struct Fitted;
