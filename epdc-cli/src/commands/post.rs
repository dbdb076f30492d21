//! Post commands
//!
//! `--go` selects civil-defence posts, `--no-go` the regular ones; with
//! neither flag every post is listed.

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use epdc_db::{Directory, Post};

use super::{print_created, print_done, print_json, print_select};

#[derive(Parser, Debug)]
pub struct PostArgs {
    #[command(subcommand)]
    pub command: PostCommands,
}

#[derive(Args, Debug, Clone, Copy)]
pub struct GoFilter {
    /// Only civil-defence posts
    #[arg(long, conflicts_with = "no_go")]
    pub go: bool,

    /// Only regular posts
    #[arg(long)]
    pub no_go: bool,
}

impl GoFilter {
    fn as_option(self) -> Option<bool> {
        match (self.go, self.no_go) {
            (true, _) => Some(true),
            (false, true) => Some(false),
            (false, false) => None,
        }
    }
}

#[derive(Subcommand, Debug)]
pub enum PostCommands {
    /// List posts by name
    List(GoFilter),
    /// List `id name` pairs
    Select(GoFilter),
    /// Show one post
    Show {
        /// Post ID
        id: i64,
    },
    /// Add a post
    Add {
        /// Post name
        name: String,
        /// Mark as a civil-defence post
        #[arg(long)]
        go: bool,
        /// Free-form note
        #[arg(long)]
        note: Option<String>,
    },
    /// Change a post
    Update {
        /// Post ID
        id: i64,
        /// New name
        #[arg(long)]
        name: Option<String>,
        /// Civil-defence flag (true/false)
        #[arg(long)]
        go: Option<bool>,
        /// New note
        #[arg(long)]
        note: Option<String>,
    },
    /// Delete a post
    Delete {
        /// Post ID
        id: i64,
    },
}

pub async fn run_post(dir: &Directory, args: PostArgs, json: bool) -> Result<()> {
    let repo = dir.posts();

    match args.command {
        PostCommands::List(filter) => {
            let posts = match filter.as_option() {
                Some(go) => repo.list_by_go(go).await?,
                None => repo.list().await?,
            };
            if json {
                return print_json(&posts);
            }
            for post in &posts {
                print_post(post);
            }
            Ok(())
        }
        PostCommands::Select(filter) => {
            let items = match filter.as_option() {
                Some(go) => repo.select_by_go(go).await?,
                None => repo.select().await?,
            };
            print_select(&items, json)
        }
        PostCommands::Show { id } => {
            let post = repo.get(id).await?;
            if json {
                return print_json(&post);
            }
            print_post(&post);
            if !post.note.is_empty() {
                println!("        {}", post.note);
            }
            Ok(())
        }
        PostCommands::Add { name, go, note } => {
            let post = Post {
                name,
                go,
                note: note.unwrap_or_default(),
                ..Post::default()
            };
            print_created("post", repo.create(&post).await?, json)
        }
        PostCommands::Update { id, name, go, note } => {
            let mut post = repo.get(id).await?;
            post.id = id;
            if let Some(name) = name {
                post.name = name;
            }
            if let Some(go) = go {
                post.go = go;
            }
            if let Some(note) = note {
                post.note = note;
            }
            repo.update(&post).await?;
            print_done(&format!("Updated post #{}", id), json)
        }
        PostCommands::Delete { id } => {
            repo.delete(id).await?;
            print_done(&format!("Deleted post #{}", id), json)
        }
    }
}

fn print_post(post: &Post) {
    let marker = if post.go { " [ГО]" } else { "" };
    println!("{:>6}  {}{}", post.id, post.name, marker);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn go_filter_maps_flags() {
        let filter = |go, no_go| GoFilter { go, no_go }.as_option();
        assert_eq!(filter(false, false), None);
        assert_eq!(filter(true, false), Some(true));
        assert_eq!(filter(false, true), Some(false));
    }
}
