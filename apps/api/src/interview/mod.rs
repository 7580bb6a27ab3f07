// Interview requests on top of ranked results: form drafts, duplicate suppression,
// submission to the scheduling service and outcome notifications.

pub mod handlers;
pub mod scheduling;
pub mod workflow;
