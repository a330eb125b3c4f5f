use super::TagId;

const ROOT: usize = 0;

#[derive(Debug, Default)]
struct Node {
    /// Sorted by char for binary search.
    children: Vec<(char, u32)>,
    terminal: Option<TagId>,
}

impl Node {
    fn child(&self, c: char) -> Option<usize> {
        self.children
            .binary_search_by_key(&c, |&(k, _)| k)
            .ok()
            .map(|i| self.children[i].1 as usize)
    }
}

/// Character trie over normalized canonical names.
///
/// Nodes live in one arena vector; children are kept ordered by character.
/// Prefixes are matched character by character, so a prefix does not need to
/// end on a token boundary.
#[derive(Debug)]
pub struct PrefixTrie {
    nodes: Vec<Node>,
    len: usize,
}

impl Default for PrefixTrie {
    fn default() -> Self {
        Self::new()
    }
}

impl PrefixTrie {
    pub fn new() -> Self {
        Self {
            nodes: vec![Node::default()],
            len: 0,
        }
    }

    /// Store `key` for `id`. A key already present keeps its original tag.
    pub fn insert(&mut self, key: &str, id: TagId) {
        let mut node = ROOT;
        for c in key.chars() {
            node = match self.nodes[node].child(c) {
                Some(next) => next,
                None => {
                    let next = self.nodes.len();
                    self.nodes.push(Node::default());
                    let children = &mut self.nodes[node].children;
                    let pos = children.partition_point(|&(k, _)| k < c);
                    children.insert(pos, (c, next as u32));
                    next
                }
            };
        }

        let terminal = &mut self.nodes[node].terminal;
        if terminal.is_none() {
            *terminal = Some(id);
            self.len += 1;
        }
    }

    /// Every tag whose key starts with `prefix`, in key order.
    ///
    /// The empty prefix returns every stored tag. Callers rank the result.
    pub fn matches_with_prefix(&self, prefix: &str) -> Vec<TagId> {
        let mut node = ROOT;
        for c in prefix.chars() {
            match self.nodes[node].child(c) {
                Some(next) => node = next,
                None => return Vec::new(),
            }
        }

        let mut out = Vec::new();
        let mut stack = vec![node];
        while let Some(current) = stack.pop() {
            let n = &self.nodes[current];
            if let Some(id) = n.terminal {
                out.push(id);
            }
            // Reverse so the smallest child is visited first.
            stack.extend(n.children.iter().rev().map(|&(_, child)| child as usize));
        }
        out
    }

    /// Whether `key` itself is stored.
    pub fn contains(&self, key: &str) -> bool {
        let mut node = ROOT;
        for c in key.chars() {
            match self.nodes[node].child(c) {
                Some(next) => node = next,
                None => return false,
            }
        }
        self.nodes[node].terminal.is_some()
    }

    /// Number of stored keys.
    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn trie() -> PrefixTrie {
        let mut trie = PrefixTrie::new();
        for (id, key) in ["blonde hair", "blonde eyes", "blue eyes", "black", "bl"]
            .iter()
            .enumerate()
        {
            trie.insert(key, id as TagId);
        }
        trie
    }

    #[test]
    fn test_prefix_inside_token() {
        let trie = trie();
        let mut hits = trie.matches_with_prefix("blon");
        hits.sort();
        assert_eq!(hits, vec![0, 1]);
    }

    #[test]
    fn test_prefix_spanning_tokens() {
        let trie = trie();
        assert_eq!(trie.matches_with_prefix("blonde h"), vec![0]);
    }

    #[test]
    fn test_key_order() {
        let trie = trie();
        // "bl" < "black" < "blonde eyes" < "blonde hair" < "blue eyes"
        assert_eq!(trie.matches_with_prefix("bl"), vec![4, 3, 1, 0, 2]);
    }

    #[test]
    fn test_empty_prefix_returns_all() {
        let trie = trie();
        assert_eq!(trie.matches_with_prefix("").len(), 5);
        assert_eq!(trie.len(), 5);
    }

    #[test]
    fn test_missing_prefix() {
        let trie = trie();
        assert!(trie.matches_with_prefix("red").is_empty());
        assert!(trie.matches_with_prefix("blonde hairs").is_empty());
    }

    #[test]
    fn test_duplicate_key_counted_once() {
        let mut trie = PrefixTrie::new();
        trie.insert("x", 0);
        trie.insert("x", 1);
        assert_eq!(trie.len(), 1);
        assert_eq!(trie.matches_with_prefix("x"), vec![0]);
        assert!(trie.contains("x"));
        assert!(!trie.contains(""));
    }

    #[test]
    fn test_multibyte_keys() {
        let mut trie = PrefixTrie::new();
        trie.insert("ñandú", 0);
        trie.insert("ñu", 1);
        let mut hits = trie.matches_with_prefix("ñ");
        hits.sort();
        assert_eq!(hits, vec![0, 1]);
    }
}
