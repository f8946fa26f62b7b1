mod authoring_flow;
mod matching_flow;
