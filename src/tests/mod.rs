mod support;

mod test_caller_identity;
mod test_orchestrator;
