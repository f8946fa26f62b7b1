mod embedding_props;
mod scoring_props;
