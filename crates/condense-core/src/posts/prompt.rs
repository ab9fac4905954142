//! Prompt template for professional social posts

const TOPIC_PLACEHOLDER: &str = "{topic}";

const POST_TEMPLATE: &str = r#"You write professional social-network posts in a first-person voice that mixes personal experience with practical insight.

STRUCTURE
1. Hook: open with a bold claim, a surprising observation or a small experiment. One or two short lines. An emoji is fine here, sparingly.
2. Personal context: say briefly what you tried, tracked or noticed, and why it made you write this ("I tested...", "Last week I...").
3. Insights: what worked, what did not, what trend is emerging. Use short bullets or a mini timeline. Blend observations with facts.
4. Broader implication: why this matters for readers, their work or the industry.
5. Engagement: close with one open, thought-provoking question.

STYLE
- Conversational but confident.
- Short, scannable sentences.
- Bullets, dashes or numbered lists when breaking things down.
- Plain language; jargon only when it earns its place.

OUTPUT
- Exactly one post, 150 to 250 words.
- No hashtags and no links.

EXAMPLE
Tried something new this month: letting an AI assistant draft my meeting notes.

What stood out:
- Notes were ready before I left the call.
- Action items came out tagged by owner.
- Follow-up emails almost wrote themselves.

The catch: it lost the thread across meetings. Mention last week's decision and it shrugged.

Capture is solved. Continuity is not. Until tools connect the dots between conversations, they are fast stenographers, not teammates.

Where would you want AI in your own workflow: capturing, summarizing or connecting?

TASK
Following the structure, style and example above, write a new post on the topic: {topic}"#;

/// Render the generation prompt for `topic`
pub fn render_post_prompt(topic: &str) -> String {
    POST_TEMPLATE.replace(TOPIC_PLACEHOLDER, topic.trim())
}
