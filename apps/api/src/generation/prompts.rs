// Prompt templates for the Generation module.
// Placeholders in `{braces}` are substituted with `str::replace` before sending.
// Closing rules come from llm_client::prompts.

/// CV generation prompt.
/// Replace: {target_match}, {sections}, {quantitative_focus}, {verb_intensity},
///          {keyword_matching}, {plain_text_rule}, {resume_text}, {job_description}
pub const CV_PROMPT_TEMPLATE: &str = r#"You are a professional resume writer and an expert in ATS optimization and keyword alignment.

Your task:
1. Parse the candidate's resume and retain authentic experience.
2. Analyze the Job Description (JD) and extract exact keywords and phrases (skills, tools, certifications, action verbs).
3. Upgrade the resume so it:
   - Uses exact JD keywords (no synonyms).
   - Achieves a minimum {target_match}% ATS score.
   - Fits within 2 A4 pages.
   - Maintains professional tone, measurable impact, and progression.

Rules:
- Always inject exact JD keywords into PROFESSIONAL SUMMARY, KEY SKILLS, and at least 70% of WORK EXPERIENCE bullets.
- Include all critical tools, methods, and responsibilities from the JD if logically relevant.
- Preserve original company names and dates; job titles may be upgraded if justified.
- Quantification: {quantitative_focus}
- Action verbs: {verb_intensity}.
- Keyword matching: {keyword_matching}.
- Avoid generic statements. Every bullet should have action + result.
- Include only these sections, in this order where present: {sections}.

Format:
NAME
Phone No | Email | Address

PROFESSIONAL SUMMARY:
Start with "Applying for [Exact JD Job Title] with X+ years..." Include at least 15 JD keywords, quantifiable results, and alignment with the role.

KEY SKILLS:
List 45 JD-derived skills: Technical Skills (15), Soft Skills (15), Job-Specific Competencies (15). Use exact JD wording, comma-separated.

WORK EXPERIENCE:
Company | Role | Dates
• Each bullet is 10-14 words and includes 1-2 JD keywords.

EDUCATION:
Same as original.

PROJECTS:
2-3 relevant projects aligned with the JD, each with 2 bullets.

CERTIFICATIONS:
Relevant certifications present in the resume.

Resume Content:
{resume_text}

Job Description:
{job_description}

{plain_text_rule}"#;

/// Cover letter prompt. Replace: {resume_text}, {job_description}, {plain_text_rule}
pub const COVER_LETTER_PROMPT_TEMPLATE: &str = r#"You are an expert ATS-optimized cover letter writer.

Objective:
Generate a personalized, professional cover letter that achieves 90%+ ATS compatibility and aligns precisely with the provided Job Description.

Rules:
- Start with: "Hello Hiring Manager," and include the line: "I am applying for the [exact job title] position."
- Use a tone that reflects professionalism and enthusiasm.

Structure:
1. Paragraph 1: Express genuine enthusiasm using the company's mission and JD language.
2. Paragraph 2: Align with the top 5 responsibilities in the JD. Provide metrics-rich accomplishments from the resume. Integrate at least 10 relevant JD keywords.
3. Paragraph 3: Highlight 2-3 JD outcome-based goals using similar phrasing and past success examples.
4. Paragraph 4: Reaffirm 2 key JD priorities. Request an interview and include a polite sign-off.

Additional Requirements:
- Use identical terminology from the JD wherever possible.
- Keep the tone formal yet engaging, max 4 paragraphs.
- After the sign-off, include the candidate's email and phone number (from the resume).

Resume:
{resume_text}

Job Description:
{job_description}

{plain_text_rule}"#;

/// ATS analysis prompt (JSON mode). Replace: {cv_content}, {job_description}, {json_only_rule}
pub const ATS_PROMPT_TEMPLATE: &str = r#"You are an ATS analysis expert.

Analyze the CV against the job description and provide:
1. ATS compatibility score (0-100)
2. Keyword match percentage (0-100)
3. Missing critical keywords
4. Specific improvement suggestions

Return a JSON object with this EXACT schema:
{
  "ats_score": 0,
  "keyword_match": 0,
  "missing_keywords": ["keyword"],
  "suggestions": ["suggestion"]
}

CV Content:
{cv_content}

Job Description:
{job_description}

{json_only_rule}"#;

/// Interview Q&A prompt. Replace: {resume_text}, {job_description}
pub const INTERVIEW_PROMPT_TEMPLATE: &str = r#"You are an expert career coach and interviewer.

TASK:
Generate exactly 20 interview questions and answers for the candidate based on their resume and the job description.

Structure:
- 8 Behavioral questions (fitment, company, teamwork, problem-solving, adaptability)
- 12 Technical questions based on ATS keywords, JD tools, frameworks, and skills.

Format STRICTLY:
Q1: [Behavioral Question]
A1:
- Point 1
- Point 2
- Point 3
- Point 4
- Point 5
- Point 6

Q2: [Next Question]
A2:
- ...

Rules:
- Every answer has at least 6 bullet points.
- No repeated questions or answers.
- Technical questions are advanced and role-specific.
- Include the most important ATS keywords in both questions and answers.

Resume:
{resume_text}

Job Description:
{job_description}"#;
