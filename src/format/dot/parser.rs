// SPDX-FileCopyrightText: 2026 Bruno Meilick
// SPDX-License-Identifier: LicenseRef-Dotlens-FreeUse-NoCopy-NoDerivatives
//
// All rights reserved.
//
// This file is part of Dotlens and is proprietary software.
// Unauthorized copying, modification, or distribution is prohibited.

use std::collections::BTreeSet;

use super::html::html_to_text;
use super::lexer::{tokenize, EdgeOp, IdKind, Token, TokenKind};
use super::DotParseError;
use crate::model::{Attributes, ClusterId, DotGraph, GraphEdge, GraphKind, NodeId};

/// Attribute defaults and cluster context of one `{ … }` block.
#[derive(Debug, Clone, Default)]
struct Scope {
    node_defaults: Attributes,
    edge_defaults: Attributes,
    enclosing_clusters: Vec<ClusterId>,
    cluster: Option<ClusterId>,
    is_root: bool,
}

/// Nodes mentioned inside a block, in first-mention order.
#[derive(Debug, Default)]
struct Members {
    order: Vec<NodeId>,
    seen: BTreeSet<NodeId>,
}

impl Members {
    fn push(&mut self, node_id: &NodeId) {
        if self.seen.insert(node_id.clone()) {
            self.order.push(node_id.clone());
        }
    }

    fn extend(&mut self, node_ids: &[NodeId]) {
        for node_id in node_ids {
            self.push(node_id);
        }
    }
}

/// Deepest `{ … }` nesting accepted; deeper input would exhaust the stack.
pub(crate) const MAX_NESTING_DEPTH: usize = 256;

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    graph: DotGraph,
}

/// Parses dot source into a [`DotGraph`].
///
/// The whole input must be exactly one graph; anything after its closing brace is rejected.
pub fn parse_dot(input: &str) -> Result<DotGraph, DotParseError> {
    let tokens = tokenize(input)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        depth: 0,
        graph: DotGraph::default(),
    };
    parser.parse_graph()?;
    Ok(parser.graph)
}

impl Parser {
    fn peek(&self) -> &Token {
        &self.tokens[self.pos]
    }

    fn advance(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        if token.kind != TokenKind::Eof {
            self.pos += 1;
        }
        token
    }

    fn peek_is(&self, kind: &TokenKind) -> bool {
        self.peek().kind == *kind
    }

    fn peek_is_id(&self) -> bool {
        matches!(self.peek().kind, TokenKind::Id { .. })
    }

    fn unexpected(&self, expected: &'static str) -> DotParseError {
        let token = self.peek();
        DotParseError::UnexpectedToken {
            line: token.line,
            column: token.column,
            expected,
            found: token.kind.describe(),
        }
    }

    fn expect(&mut self, kind: TokenKind, expected: &'static str) -> Result<Token, DotParseError> {
        if self.peek_is(&kind) {
            Ok(self.advance())
        } else {
            Err(self.unexpected(expected))
        }
    }

    /// Consumes an id, joining `"a" + "b"` concatenations and flattening HTML strings.
    fn expect_id(&mut self, expected: &'static str) -> Result<String, DotParseError> {
        let (kind, mut text) = match &self.peek().kind {
            TokenKind::Id { kind, text } => (*kind, text.clone()),
            _ => return Err(self.unexpected(expected)),
        };
        self.advance();

        match kind {
            IdKind::Quoted => {
                while self.peek_is(&TokenKind::Plus) {
                    self.advance();
                    let tail = match &self.peek().kind {
                        TokenKind::Id { kind: IdKind::Quoted, text: tail } => tail.clone(),
                        _ => return Err(self.unexpected("a quoted string after '+'")),
                    };
                    self.advance();
                    text.push_str(&tail);
                }
                Ok(text)
            }
            IdKind::Html => Ok(html_to_text(&text)),
            IdKind::Plain | IdKind::Numeral => Ok(text),
        }
    }

    fn expect_node_id(&mut self) -> Result<NodeId, DotParseError> {
        self.expect_id("a node id").map(NodeId::from_dot)
    }

    fn parse_graph(&mut self) -> Result<(), DotParseError> {
        let strict = self.peek().is_keyword("strict");
        if strict {
            self.advance();
        }

        let header = self.peek().clone();
        let kind = if header.is_keyword("graph") {
            GraphKind::Graph
        } else if header.is_keyword("digraph") {
            GraphKind::Digraph
        } else {
            return Err(DotParseError::MissingHeader {
                line: header.line,
                column: header.column,
                found: header.kind.describe(),
            });
        };
        self.advance();

        self.graph = DotGraph::new(kind);
        self.graph.set_strict(strict);
        if self.peek_is_id() {
            let name = self.expect_id("a graph name")?;
            self.graph.set_name(Some(name));
        }

        self.expect(TokenKind::LBrace, "'{'")?;
        let mut scope = Scope {
            is_root: true,
            ..Scope::default()
        };
        let mut members = Members::default();
        self.parse_stmt_list(&mut scope, &mut members)?;
        self.expect(TokenKind::RBrace, "'}'")?;

        let trailing = self.peek();
        if trailing.kind != TokenKind::Eof {
            return Err(DotParseError::TrailingContent {
                line: trailing.line,
                column: trailing.column,
                found: trailing.kind.describe(),
            });
        }
        Ok(())
    }

    fn parse_stmt_list(
        &mut self,
        scope: &mut Scope,
        members: &mut Members,
    ) -> Result<(), DotParseError> {
        loop {
            match self.peek().kind {
                TokenKind::RBrace => return Ok(()),
                TokenKind::Eof => return Err(self.unexpected("'}'")),
                TokenKind::Semi => {
                    self.advance();
                }
                _ => {
                    self.parse_stmt(scope, members)?;
                    if self.peek_is(&TokenKind::Semi) {
                        self.advance();
                    }
                }
            }
        }
    }

    fn parse_stmt(&mut self, scope: &mut Scope, members: &mut Members) -> Result<(), DotParseError> {
        let token = self.peek().clone();

        for (keyword, target) in [
            ("graph", AttrTarget::Graph),
            ("node", AttrTarget::Node),
            ("edge", AttrTarget::Edge),
        ] {
            if token.is_keyword(keyword) {
                self.advance();
                let attrs = self.parse_attr_lists()?;
                self.apply_attr_stmt(scope, target, attrs);
                return Ok(());
            }
        }

        if token.is_keyword("subgraph") || token.kind == TokenKind::LBrace {
            let nodes = self.parse_subgraph(scope)?;
            members.extend(&nodes);
            if matches!(self.peek().kind, TokenKind::EdgeOp(_)) {
                self.parse_edge_rhs(scope, nodes, members)?;
            }
            return Ok(());
        }

        if !self.peek_is_id() {
            return Err(self.unexpected("a statement"));
        }

        if self.tokens.get(self.pos + 1).is_some_and(|next| next.kind == TokenKind::Equals) {
            let key = self.expect_id("an attribute name")?;
            self.advance();
            let value = self.expect_id("an attribute value")?;
            let attrs = Attributes::from([(key, value)]);
            self.apply_attr_stmt(scope, AttrTarget::Graph, attrs);
            return Ok(());
        }

        let node_id = self.expect_node_id()?;
        self.skip_port()?;

        if matches!(self.peek().kind, TokenKind::EdgeOp(_)) {
            self.declare_node(scope, &node_id, &Attributes::new(), members);
            return self.parse_edge_rhs(scope, vec![node_id], members);
        }

        let attrs = if self.peek_is(&TokenKind::LBracket) {
            self.parse_attr_lists()?
        } else {
            Attributes::new()
        };
        self.declare_node(scope, &node_id, &attrs, members);
        Ok(())
    }

    fn apply_attr_stmt(&mut self, scope: &mut Scope, target: AttrTarget, attrs: Attributes) {
        match target {
            AttrTarget::Node => scope.node_defaults.extend(attrs),
            AttrTarget::Edge => scope.edge_defaults.extend(attrs),
            AttrTarget::Graph if scope.is_root => {
                for (key, value) in attrs {
                    self.graph.set_attribute(key, value);
                }
            }
            AttrTarget::Graph => {
                let Some(cluster_id) = scope.cluster.as_ref() else {
                    return;
                };
                if let Some(label) = attrs.get("label") {
                    if let Some(cluster) = self.graph.clusters_mut().get_mut(cluster_id) {
                        cluster.set_label(Some(label.clone()));
                    }
                }
            }
        }
    }

    fn declare_node(
        &mut self,
        scope: &Scope,
        node_id: &NodeId,
        attrs: &Attributes,
        members: &mut Members,
    ) {
        self.graph.upsert_node(node_id.clone(), &scope.node_defaults, attrs);
        for cluster_id in &scope.enclosing_clusters {
            if let Some(cluster) = self.graph.clusters_mut().get_mut(cluster_id) {
                cluster.add_node(node_id.clone());
            }
        }
        members.push(node_id);
    }

    fn parse_subgraph(&mut self, parent: &Scope) -> Result<Vec<NodeId>, DotParseError> {
        let mut name = None::<String>;
        if self.peek().is_keyword("subgraph") {
            self.advance();
            if self.peek_is_id() {
                name = Some(self.expect_id("a subgraph name")?);
            }
        }
        let open = self.expect(TokenKind::LBrace, "'{'")?;
        if self.depth >= MAX_NESTING_DEPTH {
            return Err(DotParseError::NestingTooDeep {
                line: open.line,
                column: open.column,
                limit: MAX_NESTING_DEPTH,
            });
        }

        let mut scope = Scope {
            node_defaults: parent.node_defaults.clone(),
            edge_defaults: parent.edge_defaults.clone(),
            enclosing_clusters: parent.enclosing_clusters.clone(),
            cluster: None,
            is_root: false,
        };

        let cluster_id = name
            .as_deref()
            .filter(|name| name.starts_with("cluster"))
            .and_then(|name| ClusterId::new(name).ok());
        if let Some(cluster_id) = cluster_id {
            self.graph.clusters_mut().entry(cluster_id.clone()).or_default();
            scope.enclosing_clusters.push(cluster_id.clone());
            scope.cluster = Some(cluster_id);
        }

        let mut members = Members::default();
        self.depth += 1;
        let parsed = self.parse_stmt_list(&mut scope, &mut members);
        self.depth -= 1;
        parsed?;
        self.expect(TokenKind::RBrace, "'}'")?;
        Ok(members.order)
    }

    fn parse_edge_rhs(
        &mut self,
        scope: &Scope,
        first: Vec<NodeId>,
        members: &mut Members,
    ) -> Result<(), DotParseError> {
        let mut operands = vec![first];

        while let TokenKind::EdgeOp(op) = self.peek().kind {
            let token = self.advance();
            self.check_edge_op(op, &token)?;

            let operand = if self.peek().is_keyword("subgraph") || self.peek_is(&TokenKind::LBrace)
            {
                let nodes = self.parse_subgraph(scope)?;
                members.extend(&nodes);
                nodes
            } else if self.peek_is_id() {
                let node_id = self.expect_node_id()?;
                self.skip_port()?;
                self.declare_node(scope, &node_id, &Attributes::new(), members);
                vec![node_id]
            } else {
                return Err(self.unexpected("a node id or subgraph after the edge operator"));
            };
            operands.push(operand);
        }

        let mut attrs = scope.edge_defaults.clone();
        if self.peek_is(&TokenKind::LBracket) {
            attrs.extend(self.parse_attr_lists()?);
        }

        for pair in operands.windows(2) {
            for from in &pair[0] {
                for to in &pair[1] {
                    self.graph.add_edge(GraphEdge::new_with(from.clone(), to.clone(), attrs.clone()));
                }
            }
        }
        Ok(())
    }

    fn check_edge_op(&self, op: EdgeOp, token: &Token) -> Result<(), DotParseError> {
        let kind = self.graph.kind();
        let allowed = match op {
            EdgeOp::Directed => kind.is_directed(),
            EdgeOp::Undirected => !kind.is_directed(),
        };
        if allowed {
            return Ok(());
        }
        Err(DotParseError::EdgeOpMismatch {
            line: token.line,
            column: token.column,
            op: op.as_str(),
            kind,
        })
    }

    /// Skips `:port` and `:port:compass` suffixes; ports do not affect the text layout.
    fn skip_port(&mut self) -> Result<(), DotParseError> {
        if self.peek_is(&TokenKind::Colon) {
            self.advance();
            self.expect_id("a port name")?;
            if self.peek_is(&TokenKind::Colon) {
                self.advance();
                self.expect_id("a compass point")?;
            }
        }
        Ok(())
    }

    /// Parses one or more `[a=b, c=d; …]` groups into a single attribute map.
    fn parse_attr_lists(&mut self) -> Result<Attributes, DotParseError> {
        let mut attrs = Attributes::new();
        self.expect(TokenKind::LBracket, "'['")?;

        loop {
            if self.peek_is(&TokenKind::RBracket) {
                self.advance();
                if self.peek_is(&TokenKind::LBracket) {
                    self.advance();
                    continue;
                }
                return Ok(attrs);
            }

            let key = self.expect_id("an attribute name or ']'")?;
            self.expect(TokenKind::Equals, "'='")?;
            let value = self.expect_id("an attribute value")?;
            attrs.insert(key, value);

            if self.peek_is(&TokenKind::Comma) || self.peek_is(&TokenKind::Semi) {
                self.advance();
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttrTarget {
    Graph,
    Node,
    Edge,
}
