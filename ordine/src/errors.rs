#[derive(Debug, Eq, PartialEq)]
pub enum SortError<Node> {
    CycleDetected(Vec<(Node, Node)>),
}

impl<Node> std::error::Error for SortError<Node> where
    Node: Clone + Ord + core::fmt::Display + core::fmt::Debug
{
}

impl<Node: Clone + Ord + std::fmt::Display + std::fmt::Debug> std::fmt::Display
    for SortError<Node>
{
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            SortError::CycleDetected(edges) => {
                write!(f, "cycle through edges:")?;
                for (src, dest) in edges.iter() {
                    write!(f, " {} -> {}", src, dest)?;
                }
                Ok(())
            }
        }
    }
}
