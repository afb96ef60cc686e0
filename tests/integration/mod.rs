mod helpers;
mod test_affected;
mod test_graph;
mod test_packages;
