use super::{
    Bookmark, Post, Project, ProjectStatus, Resource, Snippet, Testimonial, TestimonialKind,
};
use time::macros::date;

pub static POSTS: [Post; 4] = [
    Post {
        slug: "taming-flaky-end-to-end-tests",
        title: "Taming Flaky End-to-End Tests",
        excerpt: "The checklist I work through whenever an end-to-end suite starts failing one run out of five.",
        date: date!(2025 - 03 - 18),
        tags: &["testing", "engineering"],
        body_markdown: r#"Every team I have joined had the same ritual: someone pushes a change,
the end-to-end suite goes red, and the author re-runs it without looking.
A suite nobody trusts is worse than no suite at all, so here is the
checklist I work through before adding a single retry.

## Find the clock

Nine out of ten flakes I have debugged were time. A test asserts on a
timestamp rendered in the local timezone, or waits a fixed 500ms for an
animation that takes 700ms on CI hardware. Replace fixed sleeps with
waits on observable state and inject the clock where you can.

## Make the data yours

Shared staging databases turn tests into lottery tickets. Each test
should create the rows it asserts on, with identifiers namespaced by run
so parallel pipelines cannot trample each other.

```ts
const runId = crypto.randomUUID().slice(0, 8)
const user = await createUser({ email: `e2e-${runId}@example.test` })
```

## Quarantine, then fix

A quarantine lane keeps the signal clean while you investigate, but it
needs an expiry date. We tag quarantined specs with an owner and a date;
anything older than two weeks fails the lint step.

The suite that results from this is smaller and slower to grow, and that
is the point. Fewer tests you believe beat hundreds you re-run.
"#,
    },
    Post {
        slug: "server-components-changed-my-data-fetching",
        title: "Server Components Changed How I Fetch Data",
        excerpt: "Moving a personal site to server-rendered components deleted most of my loading states.",
        date: date!(2024 - 11 - 02),
        tags: &["react", "web"],
        body_markdown: r#"This site used to fetch everything on the client: view counts,
project metadata, even the navigation. Every page began life as a
skeleton screen. Moving the rendering to the server deleted almost all
of that machinery.

## Fetch where you render

When the component that displays data is the same code that fetches it,
the waterfall becomes visible in one file. The view counter on my blog
posts went from a context provider, a hook, and a spinner to a single
awaited call.

## Fire and forget has a place

Not everything should block the response. Recording a page view is a
side effect the reader should never wait on, so the tracking call is
spawned and detached while the page streams out. If the write fails, the
page does not care.

## What I gave up

Optimistic interactions need more thought when state lives server-side.
The counter shows `stored + 1` to the viewer who just triggered the
increment, because the write they caused has not necessarily landed yet.
It is a small lie that is true a moment later.
"#,
    },
    Post {
        slug: "what-shipping-a-side-project-taught-me",
        title: "What Shipping a Side Project Actually Taught Me",
        excerpt: "Eighteen months of nights and weekends, one small app in production, and the lessons that stuck.",
        date: date!(2024 - 06 - 21),
        tags: &["career", "engineering"],
        body_markdown: r#"My habit tracker has a few hundred users, which rounds to zero in
industry terms and to infinity compared with the projects I never
shipped. The difference was scope.

## Cut until it hurts, then once more

The first version had streaks, social feeds, and reminders. The version
that shipped had a list and a checkbox. Nobody asked where the feed
went.

## Boring technology compounds

I run one server, one Postgres instance, and one cron job. In eighteen
months the only outage was a certificate I forgot to renew. Every
exciting dependency I avoided is a page I was never woken up by.

## Support is the product

The first support email scared me more than any incident at work. But
answering it well earned a user who reported four real bugs over the
next year. Treat every report as a gift from someone who cared enough
to type.
"#,
    },
    Post {
        slug: "reading-production-incidents-like-a-historian",
        title: "Reading Production Incidents Like a Historian",
        excerpt: "Postmortems are primary sources. Most of what we call root causes are just where we stopped reading.",
        date: date!(2023 - 09 - 14),
        tags: &["engineering", "culture"],
        body_markdown: r#"After our third cache-invalidation incident in a quarter, I stopped
writing postmortems as confessionals and started reading old ones as
primary sources. The pattern was never the bug; it was the decade of
reasonable decisions around it.

## Timelines lie by omission

The incident doc says the outage began at 14:02. The interesting part
is the deploy at 13:40, the alert that was downgraded to a warning in
March, and the runbook step that assumed a dashboard which had been
renamed. Write those down while people still remember.

## "Root cause" is where we stopped

Five whys ends wherever the facilitator gets tired. Prefer a map of
contributing factors over a single culprit; the fix list it produces is
longer and far more honest.

## Archive like you will be read

Future engineers will read your postmortem the way you read a commit
from 2014: without context, at 2 a.m., mid-incident. Link the graphs,
inline the queries, and say what you would try first next time.
"#,
    },
];

pub static PROJECTS: [Project; 4] = [
    Project {
        slug: "routinely",
        name: "Routinely",
        tagline: "A deliberately small habit tracker. One list, one checkbox, no feed.",
        url: Some("https://routinely.app"),
        stack: &["TypeScript", "React Native", "Postgres"],
        status: ProjectStatus::Live,
    },
    Project {
        slug: "folia",
        name: "Folia",
        tagline: "The server rendering the page you are reading, view counter included.",
        url: Some("https://github.com/nbrq/folia"),
        stack: &["Rust", "Axum", "Askama"],
        status: ProjectStatus::Live,
    },
    Project {
        slug: "shelfware",
        name: "Shelfware",
        tagline: "Browser extension that files every saved link into a weekly reading digest.",
        url: None,
        stack: &["TypeScript", "WebExtensions"],
        status: ProjectStatus::InProgress,
    },
    Project {
        slug: "gradient-garden",
        name: "Gradient Garden",
        tagline: "A generative CSS gradient playground from before every site had one.",
        url: None,
        stack: &["JavaScript", "Canvas"],
        status: ProjectStatus::Archived,
    },
];

pub static TESTIMONIALS: [Testimonial; 6] = [
    Testimonial {
        author: "Maren Kowalski",
        role: "Founder, Brightloop",
        kind: TestimonialKind::Client,
        quote: "They shipped our MVP in six weeks and spent the seventh deleting half of it. Best decision anyone made on the project.",
        link: Some("https://brightloop.example"),
    },
    Testimonial {
        author: "Tomas Rivera",
        role: "CTO, Fieldnote",
        kind: TestimonialKind::Client,
        quote: "Rare mix of product sense and engineering depth. The handover docs alone were worth the engagement.",
        link: None,
    },
    Testimonial {
        author: "Priya Nair",
        role: "Engineering Manager",
        kind: TestimonialKind::Lead,
        quote: "The person you want in an incident channel: calm, methodical, and already reading the diff.",
        link: None,
    },
    Testimonial {
        author: "Jonas Weber",
        role: "Staff Engineer",
        kind: TestimonialKind::Lead,
        quote: "Raised the quality bar of the whole team just by how they wrote pull request descriptions.",
        link: None,
    },
    Testimonial {
        author: "Alice Duarte",
        role: "Senior Frontend Engineer",
        kind: TestimonialKind::Colleague,
        quote: "Pairing with them is a masterclass in asking the dumb question first and saving the afternoon.",
        link: None,
    },
    Testimonial {
        author: "Kenji Mori",
        role: "Product Designer",
        kind: TestimonialKind::Colleague,
        quote: "Actually reads the design spec. Then improves it. I have receipts.",
        link: None,
    },
];

pub static BOOKMARKS: [Bookmark; 5] = [
    Bookmark {
        title: "How to Do Great Work",
        url: "http://paulgraham.com/greatwork.html",
        note: "Re-read every January. The compounding argument for working on what you actually care about.",
        topic: "Career",
    },
    Bookmark {
        title: "The Grug Brained Developer",
        url: "https://grugbrain.dev",
        note: "Complexity very, very bad. The funniest serious essay on software design.",
        topic: "Engineering",
    },
    Bookmark {
        title: "Systems design explains the world",
        url: "https://apenwarr.ca/log/20201227",
        note: "Why the org chart ships itself, explained with actual systems thinking.",
        topic: "Engineering",
    },
    Bookmark {
        title: "An app can be a home-cooked meal",
        url: "https://www.robinsloan.com/notes/home-cooked-app/",
        note: "Permission to build software for twelve people and call it done.",
        topic: "Making",
    },
    Bookmark {
        title: "Use plaintext email",
        url: "https://useplaintext.email",
        note: "Settled an argument with a client in one link.",
        topic: "Misc",
    },
];

pub static SNIPPETS: [Snippet; 3] = [
    Snippet {
        title: "Exhaustive switch over a union",
        language: "TypeScript",
        description: "The `never` trick that turns a forgotten union member into a compile error.",
        body_markdown: r#"```ts
type Status = 'idle' | 'loading' | 'done'

function label(status: Status): string {
  switch (status) {
    case 'idle':
      return 'Waiting'
    case 'loading':
      return 'Working'
    case 'done':
      return 'Finished'
    default: {
      const unreachable: never = status
      throw new Error(`unhandled status: ${unreachable}`)
    }
  }
}
```
"#,
    },
    Snippet {
        title: "Debounced search input hook",
        language: "TypeScript",
        description: "The three-line debounce hook I paste into every React project eventually.",
        body_markdown: r#"```ts
function useDebounced<T>(value: T, delayMs = 300): T {
  const [debounced, setDebounced] = useState(value)
  useEffect(() => {
    const handle = setTimeout(() => setDebounced(value), delayMs)
    return () => clearTimeout(handle)
  }, [value, delayMs])
  return debounced
}
```
"#,
    },
    Snippet {
        title: "Postgres upsert counter",
        language: "SQL",
        description: "Atomic insert-or-increment in one statement. The counter on this site does not use it, on purpose.",
        body_markdown: r#"```sql
INSERT INTO view_counts (key, count)
VALUES ($1, 1)
ON CONFLICT (key)
DO UPDATE SET count = view_counts.count + 1;
```
"#,
    },
];

pub static RESOURCES: [Resource; 4] = [
    Resource {
        title: "Uses",
        url: "https://github.com/nbrq/dotfiles",
        blurb: "Editor config, shell setup, and the keyboard layout people keep asking about.",
    },
    Resource {
        title: "Talk: Counting Views Badly, On Purpose",
        url: "https://example.test/talks/counting-views",
        blurb: "Twenty minutes on why the view counter on this site is allowed to lose updates.",
    },
    Resource {
        title: "Freelance starter contract",
        url: "https://example.test/resources/contract.pdf",
        blurb: "The plain-language contract template I use for small engagements.",
    },
    Resource {
        title: "Reading list",
        url: "https://example.test/resources/reading",
        blurb: "Books that survived a decade of shelf purges.",
    },
];
