use crate::{metrics::SkillBar, page::PageContent, typing::PHRASES};

pub struct NavSection {
    pub id: &'static str,
    pub label: &'static str,
    pub icon: &'static str,
}

pub const NAV_SECTIONS: [NavSection; 5] = [
    NavSection { id: "home", label: "Home", icon: "fa-house" },
    NavSection { id: "about", label: "About", icon: "fa-user" },
    NavSection { id: "skills", label: "Skills", icon: "fa-code" },
    NavSection { id: "projects", label: "Projects", icon: "fa-briefcase" },
    NavSection { id: "contact", label: "Contact", icon: "fa-envelope" },
];

pub struct AboutBox {
    pub icon: &'static str,
    pub title: &'static str,
    pub subtitle: &'static str,
}

pub const ABOUT_BOXES: [AboutBox; 3] = [
    AboutBox { icon: "fa-award", title: "Experience", subtitle: "2+ Years" },
    AboutBox { icon: "fa-briefcase", title: "Completed", subtitle: "20+ Projects" },
    AboutBox { icon: "fa-headset", title: "Support", subtitle: "Online 24/7" },
];

pub const SKILLS: [(&str, u8); 6] = [
    ("HTML", 90),
    ("CSS", 85),
    ("JavaScript", 80),
    ("Rust", 70),
    ("React", 75),
    ("Figma", 65),
];

pub const FILTERS: [(&str, &str); 4] = [
    ("all", "All"),
    ("web", "Web"),
    ("design", "Design"),
    ("app", "App"),
];

pub struct Project {
    pub title: &'static str,
    pub description: &'static str,
    pub category: &'static str,
    pub image: &'static str,
    pub tags: &'static [&'static str],
    pub demo: &'static str,
    pub source: &'static str,
}

pub const PROJECTS: [Project; 6] = [
    Project {
        title: "E-Commerce Storefront",
        description: "Responsive shop front with cart, filtering and checkout flow.",
        category: "web",
        image: "/assets/img/project-1.jpg",
        tags: &["HTML", "CSS", "JavaScript"],
        demo: "#",
        source: "https://github.com/",
    },
    Project {
        title: "Brand Identity Kit",
        description: "Logo, palette and typography system for a local café.",
        category: "design",
        image: "/assets/img/project-2.jpg",
        tags: &["Figma", "Illustrator"],
        demo: "#",
        source: "https://github.com/",
    },
    Project {
        title: "Task Tracker",
        description: "Offline-friendly task list with drag and drop ordering.",
        category: "app",
        image: "/assets/img/project-3.jpg",
        tags: &["Rust", "WebAssembly"],
        demo: "#",
        source: "https://github.com/",
    },
    Project {
        title: "Weather Dashboard",
        description: "Forecast dashboard pulling from a public weather API.",
        category: "web",
        image: "/assets/img/project-4.jpg",
        tags: &["React", "REST"],
        demo: "#",
        source: "https://github.com/",
    },
    Project {
        title: "Landing Page Concepts",
        description: "Three landing page explorations for a fitness startup.",
        category: "design",
        image: "/assets/img/project-5.jpg",
        tags: &["Figma"],
        demo: "#",
        source: "https://github.com/",
    },
    Project {
        title: "Habit Companion",
        description: "Mobile-first habit tracker with streaks and reminders.",
        category: "app",
        image: "/assets/img/project-6.jpg",
        tags: &["Flutter", "Firebase"],
        demo: "#",
        source: "https://github.com/",
    },
];

pub fn project_image_id(index: usize) -> String {
    format!("project-img-{index}")
}

pub fn page_content() -> PageContent {
    PageContent {
        phrases: PHRASES.iter().map(|phrase| phrase.to_string()).collect(),
        skills: SKILLS
            .iter()
            .map(|(name, percentage)| SkillBar::new(*name, *percentage))
            .collect(),
        counters: ABOUT_BOXES
            .iter()
            .map(|about| about.subtitle.to_string())
            .collect(),
        project_categories: PROJECTS
            .iter()
            .map(|project| project.category.to_string())
            .collect(),
        deferred_images: PROJECTS
            .iter()
            .enumerate()
            .map(|(index, project)| (project_image_id(index), project.image.to_string()))
            .collect(),
    }
}
